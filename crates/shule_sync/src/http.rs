//! HTTP transport implementation.
//!
//! The actual HTTP client is abstracted via a trait so the app shell can
//! plug in whatever client its platform provides (reqwest, hyper, a WebView
//! bridge, ...) without this crate taking a network dependency.

use crate::error::TransportError;
use crate::transport::{SyncTransport, UpsertAck, UpsertRequest};
use serde::Deserialize;

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. The client
/// must enforce its own request timeout and report it as an error string;
/// the transport classifies everything it cannot reach as retryable.
pub trait HttpClient: Send + Sync {
    /// Sends a PUT request with a JSON body; returns status and body.
    fn put(&self, url: &str, body: Vec<u8>) -> Result<(u16, Vec<u8>), String>;
}

/// HTTP-based sync transport.
///
/// Upserts are idempotent PUTs to `{base_url}/v1/{resource}/{id}` - the
/// device assigns ids, so the server decides create-vs-update from whether
/// the id already exists.
pub struct HttpTransport<C: HttpClient> {
    /// Base URL of the collection server (e.g. "https://emis.example.org").
    base_url: String,
    /// HTTP client implementation.
    client: C,
}

/// Error detail shape some servers return.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn failure_message(status: u16, body: &[u8]) -> String {
        if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
            if let Some(message) = parsed.message.or(parsed.error) {
                return message;
            }
        }
        let text = String::from_utf8_lossy(body);
        let text = text.trim();
        if text.is_empty() {
            format!("HTTP {status}")
        } else {
            text.to_string()
        }
    }
}

impl<C: HttpClient> SyncTransport for HttpTransport<C> {
    fn upsert(&self, request: &UpsertRequest) -> Result<UpsertAck, TransportError> {
        let url = format!(
            "{}/v1/{}/{}",
            self.base_url,
            request.kind.resource(),
            request.entity_id
        );
        let body = serde_json::to_vec(&request.body)
            .map_err(|err| TransportError::Protocol(err.to_string()))?;

        let (status, response_body) = self
            .client
            .put(&url, body)
            .map_err(TransportError::unreachable)?;

        match status {
            200..=299 => Ok(UpsertAck {
                entity_id: request.entity_id,
            }),
            400..=499 => Err(TransportError::Rejected(Self::failure_message(
                status,
                &response_body,
            ))),
            _ => Err(TransportError::server(
                status,
                Self::failure_message(status, &response_body),
            )),
        }
    }
}
