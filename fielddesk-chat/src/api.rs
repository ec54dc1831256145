//! Thin HTTP client over the chat-management REST surface.
//!
//! Every call fails closed: a network error or non-2xx response becomes a
//! [`TransportError`] and the caller decides how to recover. No retry policy
//! lives here: retries belong to callers, so polling traffic is never
//! silently amplified.

use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart};
use serde::de::DeserializeOwned;
use shared::config::ApiConfig;
use shared::models::{Acknowledgement, ErrorResponse, ThreadListResponse, ThreadResponse};
use thiserror::Error;
use url::Url;

/// Failure of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("server rejected request with {status}: {message}")]
    Rejected {
        status: StatusCode,
        message: String,
    },
}

impl TransportError {
    /// The HTTP status carried by the failure, when one exists.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Network(err) => err.status(),
            Self::Rejected { status, .. } => Some(*status),
        }
    }
}

/// One staged attachment; selecting a new file replaces any previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Fully assembled outgoing message, ready for the multipart send endpoint.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub room: String,
    pub text: Option<String>,
    pub attachment: Option<AttachmentUpload>,
    pub sender_id: String,
    pub sender_name: String,
    pub role: String,
}

/// Client for the chat-management endpoints.
#[derive(Debug, Clone)]
pub struct ChatApi {
    base: Url,
    storage_prefix: String,
    client: Client,
    token: Option<String>,
}

impl ChatApi {
    /// Creates a client rooted at `base`. The URL must be hierarchical
    /// (http/https); `Config::validate` enforces this for configured URLs.
    #[must_use]
    pub fn new(base: Url, storage_prefix: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base,
            storage_prefix: storage_prefix.into(),
            client: Client::new(),
            token,
        }
    }

    /// Builds a client from the configured API section.
    ///
    /// # Errors
    /// Returns an error when the configured base URL does not parse.
    pub fn from_config(config: &ApiConfig) -> Result<Self, url::ParseError> {
        let base = Url::parse(&config.base_url)?;
        Ok(Self::new(
            base,
            config.storage_prefix.clone(),
            config.token.clone(),
        ))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => error.to_string(),
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body,
        };
        Err(TransportError::Rejected { status, message })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        let response = self.apply_auth(self.client.get(url)).send().await?;
        Self::decode(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        let response = self.apply_auth(self.client.delete(url)).send().await?;
        Self::decode(response).await
    }

    /// Fetches the thread directory, top-`limit` rooms by recency.
    ///
    /// # Errors
    /// Fails closed on any network or HTTP error.
    pub async fn list_threads(&self, limit: u32) -> Result<ThreadListResponse, TransportError> {
        let mut url = self.endpoint(&["chat-management"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    /// Fetches the most recent `limit` messages (most-recent-first) and the
    /// participant roster for one room.
    ///
    /// # Errors
    /// Fails closed on any network or HTTP error.
    pub async fn fetch_thread(
        &self,
        room: &str,
        limit: u32,
    ) -> Result<ThreadResponse, TransportError> {
        let mut url = self.endpoint(&["chat-management", "thread", room]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    /// Posts one message as a multipart form. Fields absent from the payload
    /// (no text, no attachment) are omitted from the form entirely.
    ///
    /// # Errors
    /// Fails closed on any network or HTTP error.
    pub async fn send_message(
        &self,
        outgoing: OutgoingMessage,
    ) -> Result<Acknowledgement, TransportError> {
        let url = self.endpoint(&["chat-management", "send"]);
        let mut form = multipart::Form::new()
            .text("room", outgoing.room)
            .text("role", outgoing.role)
            .text("sender_id", outgoing.sender_id)
            .text("sender_nama", outgoing.sender_name);
        if let Some(text) = outgoing.text {
            form = form.text("message", text);
        }
        if let Some(upload) = outgoing.attachment {
            form = form.part(
                "file",
                multipart::Part::bytes(upload.bytes).file_name(upload.file_name),
            );
        }

        let response = self
            .apply_auth(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Hard-deletes one message by id.
    ///
    /// # Errors
    /// Fails closed on any network or HTTP error.
    pub async fn delete_message(&self, id: i64) -> Result<Acknowledgement, TransportError> {
        let url = self.endpoint(&["chat-management", &id.to_string()]);
        self.delete_json(url).await
    }

    /// Deletes every message in a room. The room key itself stays usable; a
    /// new first message recreates the projection.
    ///
    /// # Errors
    /// Fails closed on any network or HTTP error.
    pub async fn delete_thread(&self, room: &str) -> Result<Acknowledgement, TransportError> {
        let url = self.endpoint(&["chat-management", "thread", room]);
        self.delete_json(url).await
    }

    /// Resolves a stored attachment path against the storage prefix. The
    /// console only references attachment bytes, it never manages them.
    #[must_use]
    pub fn attachment_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.storage_prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
