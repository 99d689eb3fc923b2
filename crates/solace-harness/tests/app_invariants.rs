//! Property-based tests for the App state machines.
//!
//! Tests verify that invariants hold under arbitrary interleavings of user
//! intents, response delivery order and injected failures.

use proptest::prelude::*;
use solace_app::{App, AppConfig, SessionContext, Tab};
use solace_harness::{Op, SimBackend, SimWorld};
use solace_proto::{ConnectionId, MessageKind, Mood, UserId, UserSummary};

const PEERS: [&str; 4] = ["ana", "ben", "cy", "dee"];

/// One step of a simulated session.
#[derive(Debug, Clone)]
enum Step {
    SetTab(Tab),
    Filter(Option<Mood>),
    Request(usize),
    Accept(usize),
    Open(usize),
    Close,
    Send(usize, String),
    Ask(String),
    ResetAssistant,
    Deliver(prop::sample::Index),
    Fail(Op),
    Recover,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Discover),
        Just(Op::Connections),
        Just(Op::Pending),
        Just(Op::SendRequest),
        Just(Op::AcceptRequest),
        Just(Op::Thread),
        Just(Op::SendMessage),
        Just(Op::Assistant),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let peer = 0..PEERS.len();
    prop_oneof![
        2 => prop::sample::select(Tab::ALL.to_vec()).prop_map(Step::SetTab),
        1 => prop::option::of(prop::sample::select(Mood::FILTERS.to_vec())).prop_map(Step::Filter),
        2 => peer.clone().prop_map(Step::Request),
        1 => (0..3usize).prop_map(Step::Accept),
        2 => peer.clone().prop_map(Step::Open),
        1 => Just(Step::Close),
        2 => (peer, "[ a-z]{0,8}").prop_map(|(p, text)| Step::Send(p, text)),
        1 => "[ a-z?]{0,12}".prop_map(Step::Ask),
        1 => Just(Step::ResetAssistant),
        8 => any::<prop::sample::Index>().prop_map(Step::Deliver),
        1 => op_strategy().prop_map(Step::Fail),
        1 => Just(Step::Recover),
    ]
}

fn backend() -> SimBackend {
    let moods = [Mood::Happy, Mood::Sad, Mood::Anxious, Mood::Tired];
    let mut backend = SimBackend::new("me");
    for (peer, mood) in PEERS.iter().zip(moods) {
        let summary = UserSummary::new(*peer, peer.to_uppercase()).with_mood(mood);
        backend = backend.with_user(summary).with_thread(*peer, &["hi", "hello"]);
    }
    backend
        .with_connection(UserSummary::new("ana", "ANA"))
        .with_pending("c0", UserSummary::new("ben", "BEN"))
        .with_pending("c1", UserSummary::new("cy", "CY"))
}

fn apply(world: &mut SimWorld, step: Step) {
    // Rejected intents are part of the exploration; only invariants matter.
    match step {
        Step::SetTab(tab) => world.dispatch(|app| app.set_tab(tab)),
        Step::Filter(mood) => world.dispatch(|app| app.set_mood_filter(mood)),
        Step::Request(i) => {
            let _ = world.intent(|app| app.send_request(&UserId::new(PEERS[i])));
        },
        Step::Accept(i) => {
            let _ = world.intent(|app| app.accept_request(&ConnectionId::new(format!("c{i}"))));
        },
        Step::Open(i) => {
            world.dispatch(|app| app.open_thread(UserSummary::new(PEERS[i], PEERS[i])));
        },
        Step::Close => world.dispatch(|app| {
            app.close_thread();
            vec![]
        }),
        Step::Send(i, text) => {
            let _ = world
                .intent(|app| app.send_message(&UserId::new(PEERS[i]), &text, MessageKind::Text));
        },
        Step::Ask(text) => {
            let _ = world.intent(|app| app.ask_assistant(&text));
        },
        Step::ResetAssistant => world.dispatch(|app| {
            app.reset_assistant();
            vec![]
        }),
        Step::Deliver(index) => {
            if !world.outstanding().is_empty() {
                let i = index.index(world.outstanding().len());
                world.deliver(i);
            }
        },
        Step::Fail(op) => world.backend_mut().fail(op),
        Step::Recover => world.backend_mut().recover_all(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// App invariants hold after every step of an arbitrary session.
    #[test]
    fn prop_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let mut world = SimWorld::new(
            App::new(SessionContext::new("me"), AppConfig::default()),
            backend(),
        );
        world.start();

        for step in steps {
            apply(&mut world, step.clone());
            let result = world.check();
            prop_assert!(result.is_ok(), "after {:?}: {:?}", step, result);
        }

        world.backend_mut().recover_all();
        world.deliver_all();
        prop_assert!(world.check().is_ok());
        prop_assert!(!world.app().assistant().is_typing());
    }

    /// Once everything settles, every list matches the backend's latest answer.
    #[test]
    fn prop_settled_lists_match_backend(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let mut world = SimWorld::new(
            App::new(SessionContext::new("me"), AppConfig::default()),
            backend(),
        );
        world.start();
        for step in steps {
            apply(&mut world, step);
        }
        world.backend_mut().recover_all();
        world.deliver_all();

        // Fresh loads after the dust settles.
        for tab in Tab::ALL {
            world.dispatch(|app| app.set_tab(tab));
        }
        world.deliver_all();

        let mood = world.app().tracker().mood_filter();
        let mut expected = world.backend().clone();
        let discover: Vec<_> =
            expected.discover(mood).unwrap().into_iter().map(|u| u.id).collect();
        let pending: Vec<_> =
            expected.pending().unwrap().into_iter().map(|p| p.connection_id).collect();

        let tracker = world.app().tracker();
        let actual: Vec<_> = tracker.discover().iter().map(|u| u.id.clone()).collect();
        prop_assert_eq!(actual, discover);
        let actual: Vec<_> = tracker.pending().iter().map(|p| p.connection_id.clone()).collect();
        prop_assert_eq!(actual, pending);
    }
}
