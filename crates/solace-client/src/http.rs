//! HTTP implementation of [`PlatformService`].
//!
//! A thin layer that maps each operation to one REST call. All relationship
//! and message semantics live in the state machines; this module only encodes
//! requests, checks status codes and decodes bodies.

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use solace_proto::{
    Connection, ConnectionId, Message, Mood, NewMessage, PendingRequest, UserId, UserSummary,
    payloads::{AssistantPrompt, AssistantReply, ConnectRequest, DailyQuote, EmergencyResource},
};

use crate::{PlatformService, ServiceConfig, ServiceError};

/// Service backed by the platform's REST API.
#[derive(Debug, Clone)]
pub struct HttpService {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpService {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidConfig`] for an unusable base URL or if
    /// the underlying HTTP client cannot be constructed.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let base = config.base()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ServiceError::InvalidConfig(e.to_string()))?;

        Ok(Self { http, base, token: config.token })
    }

    /// Backend origin requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::InvalidConfig("base url: cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ServiceError> {
        let builder = self.http.request(method, self.url(segments)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = checked(op, request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(op, error = %e, "undecodable response body");
            ServiceError::from(e)
        })
    }

    async fn ack(&self, op: &'static str, request: RequestBuilder) -> Result<(), ServiceError> {
        checked(op, request.send().await?).await.map(drop)
    }
}

/// Map a non-success status to [`ServiceError::Status`].
async fn checked(op: &'static str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(op, status = status.as_u16(), "request rejected");
    Err(ServiceError::Status { status: status.as_u16(), body })
}

impl PlatformService for HttpService {
    async fn discover(&self, mood: Option<Mood>) -> Result<Vec<UserSummary>, ServiceError> {
        let mut request = self.request(Method::GET, &["api", "connections", "discover"])?;
        if let Some(mood) = mood {
            request = request.query(&[("mood", mood.as_str())]);
        }
        self.fetch("discover", request).await
    }

    async fn connections(&self) -> Result<Vec<Connection>, ServiceError> {
        let request = self.request(Method::GET, &["api", "connections", "my"])?;
        self.fetch("connections", request).await
    }

    async fn pending(&self) -> Result<Vec<PendingRequest>, ServiceError> {
        let request = self.request(Method::GET, &["api", "connections", "pending"])?;
        self.fetch("pending", request).await
    }

    async fn send_request(&self, target: &UserId) -> Result<(), ServiceError> {
        let body = ConnectRequest { target_user_id: target.clone() };
        let request = self.request(Method::POST, &["api", "connections", "request"])?.json(&body);
        self.ack("send_request", request).await
    }

    async fn accept_request(&self, connection: &ConnectionId) -> Result<(), ServiceError> {
        let request =
            self.request(Method::POST, &["api", "connections", "accept", connection.as_str()])?;
        self.ack("accept_request", request).await
    }

    async fn thread(&self, peer: &UserId) -> Result<Vec<Message>, ServiceError> {
        let request =
            self.request(Method::GET, &["api", "connections", "messages", peer.as_str()])?;
        self.fetch("thread", request).await
    }

    async fn send_message(&self, message: &NewMessage) -> Result<Message, ServiceError> {
        let request =
            self.request(Method::POST, &["api", "connections", "messages"])?.json(message);
        self.fetch("send_message", request).await
    }

    async fn ask_assistant(&self, prompt: &str) -> Result<AssistantReply, ServiceError> {
        let body = AssistantPrompt { message: prompt.to_owned() };
        let request = self.request(Method::POST, &["api", "extras", "sal"])?.json(&body);
        self.fetch("ask_assistant", request).await
    }

    async fn daily_quote(&self) -> Result<DailyQuote, ServiceError> {
        let request = self.request(Method::GET, &["api", "extras", "quote"])?;
        self.fetch("daily_quote", request).await
    }

    async fn emergency_resources(&self) -> Result<Vec<EmergencyResource>, ServiceError> {
        let request = self.request(Method::GET, &["api", "extras", "emergency-resources"])?;
        self.fetch("emergency_resources", request).await
    }
}

#[cfg(test)]
mod tests {
    use solace_proto::MessageKind;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    /// Serve one canned response and hand back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse().ok())?
            })
            .unwrap_or(0usize);
        raw.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn discover_sends_mood_query_and_bearer_token() {
        let (base, server) =
            serve_once("200 OK", r#"[{"id":"u1","username":"tide","current_mood":"sad"}]"#).await;
        let service = HttpService::new(ServiceConfig::new(base).with_token("tok-1")).unwrap();

        let users = service.discover(Some(Mood::Sad)).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].current_mood, Some(Mood::Sad));
        assert!(request.starts_with("GET /api/connections/discover?mood=sad HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-1"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let service = HttpService::new(ServiceConfig::new(base)).unwrap();

        let result = service.pending().await;
        server.await.unwrap();

        match result {
            Err(ServiceError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            },
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_message_posts_body_and_returns_server_copy() {
        let (base, server) = serve_once(
            "201 Created",
            r#"{"id":"m-77","sender_id":"me","receiver_id":"u1","content":"hi","message_type":"text"}"#,
        )
        .await;
        let service = HttpService::new(ServiceConfig::new(base)).unwrap();

        let body = NewMessage {
            receiver_id: UserId::new("u1"),
            content: "hi".into(),
            message_type: MessageKind::Text,
        };
        let stored = service.send_message(&body).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(stored.id.as_str(), "m-77");
        assert!(request.starts_with("POST /api/connections/messages HTTP/1.1"));
        assert!(request.contains(r#""receiver_id":"u1""#));
    }

    #[tokio::test]
    async fn ids_are_path_encoded() {
        let (base, server) = serve_once("200 OK", "null").await;
        let service = HttpService::new(ServiceConfig::new(base)).unwrap();

        service.accept_request(&ConnectionId::new("a/b")).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/connections/accept/a%2Fb HTTP/1.1"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", r#"{"unexpected":true}"#).await;
        let service = HttpService::new(ServiceConfig::new(base)).unwrap();

        let result = service.ask_assistant("hello").await;
        let request = server.await.unwrap();

        assert!(matches!(result, Err(ServiceError::Decode(_))));
        assert!(request.contains(r#""message":"hello""#));
    }

    #[tokio::test]
    async fn closed_port_is_a_transient_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpService::new(ServiceConfig::new(format!("http://{addr}"))).unwrap();
        let result = service.connections().await;

        assert!(matches!(&result, Err(ServiceError::Transport(_))));
        assert!(result.is_err_and(|e| e.is_transient()));
    }
}
