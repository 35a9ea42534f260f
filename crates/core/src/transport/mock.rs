//! Scripted transport for tests and offline runs.
//!
//! Responses are scripted per URL. Each status request consumes the next
//! scripted result; the last one keeps repeating, so a single scripted
//! response answers every tick.

use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use pw_protocol::StatusResponse;
use reqwest::Url;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A request seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    Status { url: String, csrf_token: String },
    Log { url: String },
}

#[derive(Debug, Default)]
struct MockState {
    statuses: HashMap<String, VecDeque<Result<StatusResponse, TransportError>>>,
    logs: HashMap<String, Result<String, TransportError>>,
    delays: HashMap<String, Duration>,
    requests: Vec<MockRequest>,
    in_flight: HashMap<String, usize>,
    max_in_flight: HashMap<String, usize>,
}

/// Transport answering from scripted responses.
///
/// Clones share their script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the results of successive status requests to `url`.
    pub fn script_status(
        &self,
        url: &str,
        results: Vec<Result<StatusResponse, TransportError>>,
    ) -> &Self {
        self.lock()
            .statuses
            .insert(url.to_string(), results.into_iter().collect());
        self
    }

    /// Answer every status request to `url` with `response`.
    pub fn respond(&self, url: &str, response: StatusResponse) -> &Self {
        self.script_status(url, vec![Ok(response)])
    }

    /// Serve `body` for log requests to `url`.
    pub fn set_log(&self, url: &str, body: &str) -> &Self {
        self.lock().logs.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    /// Fail log requests to `url`.
    pub fn fail_log(&self, url: &str, error: TransportError) -> &Self {
        self.lock().logs.insert(url.to_string(), Err(error));
        self
    }

    /// Delay every request to `url`.
    pub fn set_delay(&self, url: &str, delay: Duration) -> &Self {
        self.lock().delays.insert(url.to_string(), delay);
        self
    }

    /// Every request seen so far, in issue order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.lock().requests.clone()
    }

    pub fn status_requests(&self, url: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| matches!(r, MockRequest::Status { url: u, .. } if u == url))
            .count()
    }

    pub fn log_requests(&self, url: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| matches!(r, MockRequest::Log { url: u } if u == url))
            .count()
    }

    /// Highest number of concurrent requests ever seen for `url`.
    pub fn max_in_flight(&self, url: &str) -> usize {
        self.lock().max_in_flight.get(url).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, key: &str, request: MockRequest) -> Option<Duration> {
        let mut state = self.lock();
        state.requests.push(request);
        let in_flight = {
            let count = state.in_flight.entry(key.to_string()).or_default();
            *count += 1;
            *count
        };
        let max = state.max_in_flight.entry(key.to_string()).or_default();
        *max = (*max).max(in_flight);
        state.delays.get(key).copied()
    }

    fn end(&self, key: &str) {
        if let Some(count) = self.lock().in_flight.get_mut(key) {
            *count = count.saturating_sub(1);
        }
    }

    fn next_status(&self, key: &str) -> Result<StatusResponse, TransportError> {
        let mut state = self.lock();
        match state.statuses.get_mut(key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| {
                Err(TransportError::Request {
                    url: key.to_string(),
                    reason: "script exhausted".to_string(),
                })
            }),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| {
                Err(TransportError::Request {
                    url: key.to_string(),
                    reason: "script exhausted".to_string(),
                })
            }),
            None => Err(TransportError::Request {
                url: key.to_string(),
                reason: "no scripted response".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_status(
        &self,
        url: &Url,
        csrf_token: &str,
    ) -> Result<StatusResponse, TransportError> {
        let key = url.as_str();
        let delay = self.begin(
            key,
            MockRequest::Status {
                url: key.to_string(),
                csrf_token: csrf_token.to_string(),
            },
        );
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.next_status(key);
        self.end(key);
        result
    }

    async fn fetch_log(&self, url: &Url) -> Result<String, TransportError> {
        let key = url.as_str();
        let delay = self.begin(
            key,
            MockRequest::Log {
                url: key.to_string(),
            },
        );
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.lock().logs.get(key).cloned().unwrap_or_else(|| {
            Err(TransportError::Status {
                url: key.to_string(),
                status: 404,
                body: "Not Found".to_string(),
            })
        });
        self.end(key);
        result
    }
}
