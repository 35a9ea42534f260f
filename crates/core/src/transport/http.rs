//! HTTP transport backed by [`reqwest`].

use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use pw_protocol::StatusResponse;
use reqwest::Url;
use std::time::Duration;

/// Form field carrying the CSRF token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Characters of an error body kept in [`TransportError::Status`].
const BODY_SNIPPET_CHARS: usize = 200;

/// Transport talking to the real backend.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Reuse an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Return the response unchanged if it has a success status code.
    async fn ensure_success(
        url: &Url,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => snippet(&text),
                Err(_) => "<unreadable body>".to_string(),
            };
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read_body(url: &Url, response: reqwest::Response) -> Result<String, TransportError> {
        let response = Self::ensure_success(url, response).await?;
        response.text().await.map_err(|e| request_error(url, e))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_status(
        &self,
        url: &Url,
        csrf_token: &str,
    ) -> Result<StatusResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .form(&[(CSRF_FIELD, csrf_token)])
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let body = Self::read_body(url, response).await?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_log(&self, url: &Url) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        Self::read_body(url, response).await
    }
}

/// Leading part of an error body, enough to recognise the page.
fn snippet(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

fn request_error(url: &Url, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
