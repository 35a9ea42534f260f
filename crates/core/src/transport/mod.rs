//! Network access for the poll loop.
//!
//! The scheduler and the log tailer only talk to the backend through the
//! [`Transport`] trait, so the HTTP client can be swapped for a scripted one
//! in tests.

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use pw_protocol::StatusResponse;
use reqwest::Url;
use thiserror::Error;

/// Failure of a single status or log request.
///
/// All variants are transient from the scheduler's point of view: they are
/// logged and the request is retried on the next tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Server answered {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },
}

impl TransportError {
    /// The URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            TransportError::Request { url, .. }
            | TransportError::Status { url, .. }
            | TransportError::Decode { url, .. }
            | TransportError::Timeout { url } => url,
        }
    }
}

/// Requests the engine issues against the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST` the CSRF token to a status endpoint and decode the JSON body.
    async fn fetch_status(
        &self,
        url: &Url,
        csrf_token: &str,
    ) -> Result<StatusResponse, TransportError>;

    /// `GET` a plain-text log resource.
    async fn fetch_log(&self, url: &Url) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn fetch_status(
        &self,
        url: &Url,
        csrf_token: &str,
    ) -> Result<StatusResponse, TransportError> {
        (**self).fetch_status(url, csrf_token).await
    }

    async fn fetch_log(&self, url: &Url) -> Result<String, TransportError> {
        (**self).fetch_log(url).await
    }
}
