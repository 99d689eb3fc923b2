//! Mood vocabulary.
//!
//! Moods are computed by the backend and attached to users. On the client they
//! only parameterize discovery queries and decorate user cards.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Fixed-vocabulary emotional-state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Happy.
    Happy,
    /// Sad.
    Sad,
    /// Anxious.
    Anxious,
    /// Angry.
    Angry,
    /// Confused.
    Confused,
    /// Tired.
    Tired,
    /// Grateful.
    Grateful,
    /// Neutral.
    Neutral,
}

/// Mood tag outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mood: {0:?}")]
pub struct UnknownMood(pub String);

impl Mood {
    /// Every mood in the vocabulary.
    pub const ALL: [Self; 8] = [
        Self::Happy,
        Self::Sad,
        Self::Anxious,
        Self::Angry,
        Self::Confused,
        Self::Tired,
        Self::Grateful,
        Self::Neutral,
    ];

    /// Moods offered as discovery filters, after the implicit "all".
    pub const FILTERS: [Self; 6] =
        [Self::Happy, Self::Sad, Self::Anxious, Self::Angry, Self::Confused, Self::Tired];

    /// Lowercase wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Angry => "angry",
            Self::Confused => "confused",
            Self::Tired => "tired",
            Self::Grateful => "grateful",
            Self::Neutral => "neutral",
        }
    }

    /// Display emoji for user cards.
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Anxious => "😰",
            Self::Angry => "😠",
            Self::Confused => "😕",
            Self::Tired => "😴",
            Self::Grateful => "🙏",
            Self::Neutral => "😐",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMood(s.to_owned()))
    }
}

/// Deserialize an optional mood, mapping unknown tags to `None`.
///
/// A single user with a mood the client does not know must not fail the
/// decode of an entire discovery list.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Mood>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|tag| match tag.parse::<Mood>() {
        Ok(mood) => Some(mood),
        Err(e) => {
            tracing::debug!(%e, "dropping mood outside vocabulary");
            None
        },
    }))
}
