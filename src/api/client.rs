//! Backend client capability and its HTTP implementation.
//!
//! The controller only ever talks to a [`Backend`]; [`HttpBackend`] maps the
//! three operations onto the MindEase REST endpoints.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{
    ChatRequest, ChatResponse, ModelUpdateRequest, ModelUpdateResponse, ModelsResponse,
};
use crate::utils::url::construct_api_url;

/// Base address used when neither config, env nor flags provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Failures surfaced by a [`Backend`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced an HTTP response (connect, TLS, I/O).
    Network(String),

    /// The backend answered with a non-2xx status.
    Server {
        /// HTTP status code.
        status: u16,
        /// Best-effort human readable detail extracted from the body.
        detail: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    InvalidResponse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(message) => write!(f, "network error: {message}"),
            BackendError::Server { status, detail } => {
                write!(f, "backend returned status {status}: {detail}")
            }
            BackendError::InvalidResponse(message) => {
                write!(f, "unexpected response from backend: {message}")
            }
        }
    }
}

impl StdError for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::InvalidResponse(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

/// The three operations the client needs from a model backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_models(&self) -> Result<ModelsResponse, BackendError>;

    async fn set_model(&self, model_name: &str) -> Result<ModelUpdateResponse, BackendError>;

    async fn send_chat(
        &self,
        message: &str,
        model_name: &str,
    ) -> Result<ChatResponse, BackendError>;
}

/// [`Backend`] over HTTP: `GET /models`, `POST /models`, `POST /chat`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_models(&self) -> Result<ModelsResponse, BackendError> {
        let url = self.url("models");
        debug!(%url, "listing models");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn set_model(&self, model_name: &str) -> Result<ModelUpdateResponse, BackendError> {
        let url = self.url("models");
        debug!(%url, model_name, "requesting model switch");
        let response = self
            .client
            .post(url)
            .json(&ModelUpdateRequest { model_name })
            .send()
            .await?;
        decode(response).await
    }

    async fn send_chat(
        &self,
        message: &str,
        model_name: &str,
    ) -> Result<ChatResponse, BackendError> {
        let url = self.url("chat");
        debug!(%url, model_name, chars = message.chars().count(), "sending chat message");
        let response = self
            .client
            .post(url)
            .json(&ChatRequest {
                message,
                model_name,
            })
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(BackendError::Server {
            status: status.as_u16(),
            detail: extract_error_detail(&body),
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| BackendError::InvalidResponse(err.to_string()))
}

/// Pull a readable message out of an error body.
///
/// FastAPI reports `{"detail": "..."}` for client errors and
/// `{"detail": {"error": "...", "traceback": "..."}}` for server faults; the
/// traceback is dropped. Anything else is returned trimmed as-is.
pub fn extract_error_detail(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };

    let summary = match value.get("detail") {
        Some(serde_json::Value::String(detail)) => Some(detail.clone()),
        Some(serde_json::Value::Object(map)) => map
            .get("error")
            .and_then(|error| error.as_str())
            .map(str::to_owned),
        _ => value
            .get("error")
            .and_then(|error| error.as_str())
            .map(str::to_owned),
    };

    summary.unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    struct CapturedRequest {
        request_line: String,
        body: Vec<u8>,
    }

    async fn read_http_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
        let mut buffer = Vec::new();
        let header_end = loop {
            let mut chunk = [0_u8; 1024];
            let read = stream.read(&mut chunk).await.expect("read request");
            assert!(read > 0, "unexpected EOF while reading headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(index) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                break index + 4;
            }
        };

        let header_text = std::str::from_utf8(&buffer[..header_end]).expect("utf8 headers");
        let mut lines = header_text.split("\r\n");
        let request_line = lines.next().unwrap_or_default().to_string();
        let content_length = lines
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.trim().parse::<usize>().expect("content length"))
            .unwrap_or(0);

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let mut chunk = vec![0_u8; content_length - body.len()];
            let read = stream.read(&mut chunk).await.expect("read body");
            assert!(read > 0, "unexpected EOF while reading body");
            body.extend_from_slice(&chunk[..read]);
        }

        CapturedRequest { request_line, body }
    }

    /// Serve a single request with the given status line and JSON body.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr");
        let status = status.to_string();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let captured = read_http_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            stream.shutdown().await.ok();
            captured
        });

        (format!("http://{addr}/"), handle)
    }

    #[tokio::test]
    async fn list_models_hits_get_models() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"available_models":["llama3-8b-8192","mixtral-8x7b"],"current_model":"llama3-8b-8192"}"#,
        )
        .await;

        let backend = HttpBackend::new(base);
        let models = backend.list_models().await.expect("models");
        let captured = server.await.expect("server task");

        assert_eq!(captured.request_line, "GET /models HTTP/1.1");
        assert_eq!(models.current_model, "llama3-8b-8192");
        assert_eq!(models.available_models.len(), 2);
    }

    #[tokio::test]
    async fn send_chat_posts_message_and_model_name() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"response":"I hear you...","current_model":"mixtral-8x7b"}"#,
        )
        .await;

        let backend = HttpBackend::new(base);
        let reply = backend
            .send_chat("I feel anxious today", "llama3-8b-8192")
            .await
            .expect("reply");
        let captured = server.await.expect("server task");

        assert_eq!(captured.request_line, "POST /chat HTTP/1.1");
        let body: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "I feel anxious today", "model_name": "llama3-8b-8192"})
        );
        assert_eq!(reply.current_model, "mixtral-8x7b");
    }

    #[tokio::test]
    async fn set_model_posts_model_name() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"available_models":["a","b"],"current_model":"b"}"#,
        )
        .await;

        let backend = HttpBackend::new(base);
        let confirmed = backend.set_model("b").await.expect("switch");
        let captured = server.await.expect("server task");

        assert_eq!(captured.request_line, "POST /models HTTP/1.1");
        let body: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(body, serde_json::json!({"model_name": "b"}));
        assert_eq!(confirmed.current_model, "b");
    }

    #[tokio::test]
    async fn non_success_status_becomes_server_error() {
        let (base, server) = serve_once(
            "400 Bad Request",
            r#"{"detail":"Model 'nope' is not available"}"#,
        )
        .await;

        let backend = HttpBackend::new(base);
        let err = backend.set_model("nope").await.unwrap_err();
        server.await.expect("server task");

        assert_eq!(
            err,
            BackendError::Server {
                status: 400,
                detail: "Model 'nope' is not available".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid_response() {
        let (base, server) = serve_once("200 OK", r#"{"reply":"wrong shape"}"#).await;

        let backend = HttpBackend::new(base);
        let err = backend.send_chat("hello", "m").await.unwrap_err();
        server.await.expect("server task");

        assert!(matches!(err, BackendError::InvalidResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(format!("http://{addr}"));
        let err = backend.list_models().await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)), "{err:?}");
    }

    #[test]
    fn extracts_nested_fastapi_error_without_traceback() {
        let body = r#"{"detail":{"error":"boom","traceback":"Traceback..."}}"#;
        assert_eq!(extract_error_detail(body), "boom");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(
            extract_error_detail("  Internal Server Error \n"),
            "Internal Server Error"
        );
        assert_eq!(extract_error_detail(r#"{"other":1}"#), r#"{"other":1}"#);
    }
}
