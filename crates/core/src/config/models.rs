//! Page configuration models.
//!
//! A page configuration carries everything the host page used to inject as
//! global constants: the CSRF token, the status endpoint(s), the element ids
//! of the affordances and the log settings.

use crate::config::error::{ConfigError, ConfigResult};
use pw_protocol::{ElementId, StatusDialect, UiRefs};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poll interval used when the page does not configure one.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Upper bound on a single status or log request.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Id given to the process of a single-process page.
pub const LEGACY_PROCESS_ID: &str = "process";

/// How console output reaches the engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// Log entries arrive inside every status response.
    #[default]
    Entries,

    /// A plain-text log file is fetched separately and replaces the console.
    File,
}

/// Per-element overrides of the default element ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UiRefsOverride {
    #[serde(default)]
    pub status_message: Option<ElementId>,
    #[serde(default)]
    pub start_button: Option<ElementId>,
    #[serde(default)]
    pub download_button: Option<ElementId>,
    #[serde(default)]
    pub profile_overview: Option<ElementId>,
    #[serde(default)]
    pub console_output: Option<ElementId>,
}

impl UiRefsOverride {
    /// Replace the ids of `base` that this override sets.
    pub fn apply(&self, base: UiRefs) -> UiRefs {
        UiRefs {
            status_message: self.status_message.clone().unwrap_or(base.status_message),
            start_button: self.start_button.clone().unwrap_or(base.start_button),
            download_button: self.download_button.clone().unwrap_or(base.download_button),
            profile_overview: self
                .profile_overview
                .clone()
                .unwrap_or(base.profile_overview),
            console_output: self.console_output.clone().unwrap_or(base.console_output),
        }
    }
}

/// One explicitly tracked process of a multi-process page.
///
/// ```toml
/// [[process]]
/// id = "fa"
/// status_url = "http://localhost:8000/fa/1/status"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Unique id of the process on this page.
    pub id: String,

    /// Endpoint answering status requests for this process.
    pub status_url: String,

    /// Log file name for `log_mode = "file"`; `None` or `"None"` while the
    /// log is not available yet.
    #[serde(default)]
    pub log_file: Option<String>,

    /// Interval override for this process, in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    /// Element id overrides; unset ids are derived from `id`.
    #[serde(default)]
    pub ui: UiRefsOverride,
}

/// Everything the engine needs from the host page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Token sent as `csrfmiddlewaretoken` with every status request.
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Status code vocabulary of the endpoints.
    #[serde(default)]
    pub dialect: StatusDialect,

    /// Where console output comes from.
    #[serde(default)]
    pub log_mode: LogMode,

    /// Base URL relative log file names are resolved against.
    #[serde(default)]
    pub log_base_url: Option<String>,

    /// Delay between the end of one tick and the start of the next.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Bound on each network request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Keep the start control visible once a process is done.
    #[serde(default)]
    pub rerun_after_done: bool,

    /// Status endpoint of a single-process page.
    #[serde(default)]
    pub status_url: Option<String>,

    /// Log file name of a single-process page.
    #[serde(default)]
    pub log_file: Option<String>,

    /// Explicitly tracked processes.
    #[serde(default, rename = "process")]
    pub processes: Vec<ProcessConfig>,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            csrf_token: None,
            dialect: StatusDialect::default(),
            log_mode: LogMode::default(),
            log_base_url: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            rerun_after_done: false,
            status_url: None,
            log_file: None,
            processes: Vec::new(),
        }
    }
}

impl PageConfig {
    /// Check that the page supplied what polling needs.
    ///
    /// URLs and process ids are checked when the registry is built.
    ///
    /// # Errors
    ///
    /// - `MissingCsrfToken` if the token is absent or blank
    /// - `MissingEndpoint` if no status URL is configured at all
    /// - `InvalidConfig` if an interval or timeout is zero
    pub fn validate(&self) -> ConfigResult<()> {
        let has_endpoint = self.status_url.as_deref().is_some_and(|u| !u.trim().is_empty())
            || !self.processes.is_empty();
        if !has_endpoint {
            return Err(ConfigError::MissingEndpoint);
        }

        if self.csrf_token().is_none() {
            return Err(ConfigError::MissingCsrfToken);
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidConfig {
                reason: "poll_interval_ms must be greater than zero".to_string(),
            });
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig {
                reason: "request_timeout_ms must be greater than zero".to_string(),
            });
        }

        if let Some(process) = self
            .processes
            .iter()
            .find(|p| p.poll_interval_ms == Some(0))
        {
            return Err(ConfigError::InvalidConfig {
                reason: format!("poll_interval_ms of process '{}' must be greater than zero", process.id),
            });
        }

        Ok(())
    }

    /// The CSRF token, if present and not blank.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
