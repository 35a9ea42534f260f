//! Job status models.
//!
//! This module defines the payload returned by a process status endpoint and
//! the canonical status vocabulary the engine works with internally.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The engine's stable representation of a background job's state.
///
/// The server reports an integer code; which integer means what depends on
/// the [`StatusDialect`] of the endpoint. Every integer decodes to exactly one
/// canonical status, with unrecognized codes landing on `Unknown`.
///
/// Normal progression:
/// Ready -> Uploading -> Running -> AwaitingRemote -> DownloadingRemote -> Done
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalStatus {
    /// Process is created and can be started.
    Ready,

    /// Input files are being uploaded to the processing server.
    Uploading,

    /// The processing server is working on the job.
    Running,

    /// The remote job finished; results have not been fetched yet.
    AwaitingRemote,

    /// Results are being downloaded from the processing server.
    DownloadingRemote,

    /// Results are available for download.
    Done,

    /// The job failed.
    Error,

    /// Downloading results from the processing server failed.
    RemoteError,

    /// The server reported a code outside the known vocabulary.
    Unknown,
}

impl CanonicalStatus {
    /// Every canonical status, in declaration order.
    pub const ALL: [CanonicalStatus; 9] = [
        CanonicalStatus::Ready,
        CanonicalStatus::Uploading,
        CanonicalStatus::Running,
        CanonicalStatus::AwaitingRemote,
        CanonicalStatus::DownloadingRemote,
        CanonicalStatus::Done,
        CanonicalStatus::Error,
        CanonicalStatus::RemoteError,
        CanonicalStatus::Unknown,
    ];

    /// Whether the job is still making progress on the server.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            CanonicalStatus::Uploading
                | CanonicalStatus::Running
                | CanonicalStatus::AwaitingRemote
                | CanonicalStatus::DownloadingRemote
        )
    }

    /// Whether the server reported an application-level failure.
    pub fn is_error(self) -> bool {
        matches!(self, CanonicalStatus::Error | CanonicalStatus::RemoteError)
    }
}

/// The integer vocabulary a status endpoint speaks.
///
/// ```toml
/// dialect = "staged"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
pub enum StatusDialect {
    /// Job model codes: 0..=5 for the normal progression, -1 and -2 for
    /// failures.
    #[default]
    Pipeline,

    /// Forced-alignment page codes: 0 ready, 1 running, 2 downloading,
    /// 3 done, -1 error.
    Staged,
}

/// One line of a job's console output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct LogEntry {
    /// Timestamp as formatted by the server.
    pub time: String,

    /// The log message.
    pub message: String,
}

impl LogEntry {
    /// Render the entry the way the console shows it: `time message`.
    pub fn render(&self) -> String {
        format!("{} {}", self.time, self.message)
    }
}

/// Body of a status endpoint response.
///
/// Only `status` is mandatory. Older pages call it `django_status`.
///
/// ```json
/// {
///   "status": 2,
///   "status_message": "Running",
///   "log": [{"time": "10:00", "message": "starting"}]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusResponse {
    /// Raw status code in the endpoint's dialect.
    #[serde(alias = "django_status")]
    pub status: i64,

    /// Human-readable status supplied by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Failure detail, meaningful when `errors` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Set when the server reports an application error.
    #[serde(default)]
    pub errors: bool,

    /// Full console log, resent on every response by endpoints that support it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<Vec<LogEntry>>,
}

impl StatusResponse {
    /// The message the server wants shown, if any.
    ///
    /// An error message wins when `errors` is set; otherwise the status
    /// message is used. Blank strings count as absent.
    pub fn server_message(&self) -> Option<&str> {
        if self.errors {
            if let Some(message) = non_blank(&self.error_message) {
                return Some(message);
            }
        }
        non_blank(&self.status_message)
    }

    /// Log entries carried by the response, empty when absent.
    pub fn log_entries(&self) -> &[LogEntry] {
        self.log.as_deref().unwrap_or_default()
    }
}

fn non_blank(message: &Option<String>) -> Option<&str> {
    message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
}
