//! Console tailing.
//!
//! Two modes, chosen by [`LogMode`]:
//!
//! - `Entries`: the status response carries the full log as a list of
//!   entries. The console is re-rendered as one `time message` line per entry
//!   whenever the rendered lines differ from what is shown.
//! - `File`: a plain-text log file is fetched separately and replaces the
//!   console. Whether a fetch happens depends on the status; see
//!   [`LogTailer::should_fetch`].
//!
//! The tailer remembers what it last rendered per process, so it never
//! writes identical content twice and knows whether a console is loaded.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::{LogMode, PageConfig};
use crate::registry::ProcessDescriptor;
use crate::surface::UiSurface;
use crate::transport::Transport;
use pw_protocol::{CanonicalStatus, StatusResponse};
use reqwest::Url;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Log file name meaning "the log does not exist yet".
pub const LOG_SENTINEL: &str = "none";

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing to do for this status, or the log is not available yet.
    Skipped,
    /// Content was obtained but matches what is already shown.
    Unchanged,
    /// The console was replaced with this many lines.
    Rendered(usize),
    /// Fetching the log failed; the console was left untouched.
    Failed,
}

/// Keeps the console of every process in sync with its log.
#[derive(Debug, Clone, Default)]
pub struct LogTailer {
    mode: LogMode,
    base_url: Option<Url>,
    consoles: HashMap<String, Vec<String>>,
}

impl LogTailer {
    pub fn new(mode: LogMode, base_url: Option<Url>) -> Self {
        Self {
            mode,
            base_url,
            consoles: HashMap::new(),
        }
    }

    /// Build a tailer from the page's log settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if `log_base_url` is set but does not parse.
    pub fn from_config(config: &PageConfig) -> ConfigResult<Self> {
        let base_url = match config.log_base_url.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => {
                Some(Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                    value: value.to_string(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };
        Ok(Self::new(config.log_mode, base_url))
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    /// Whether the console of `process_id` shows any content.
    pub fn is_loaded(&self, process_id: &str) -> bool {
        self.consoles
            .get(process_id)
            .is_some_and(|lines| !lines.is_empty())
    }

    /// Lines last rendered for `process_id`.
    pub fn lines(&self, process_id: &str) -> &[String] {
        self.consoles
            .get(process_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether file mode fetches the log for `status`.
    ///
    /// Active statuses always fetch. Terminal and unknown statuses fetch only
    /// while nothing has been loaded, so a failed job still shows its log
    /// once. `Ready` never fetches.
    pub fn should_fetch(&self, process_id: &str, status: CanonicalStatus) -> bool {
        match status {
            CanonicalStatus::Ready => false,
            CanonicalStatus::Uploading
            | CanonicalStatus::Running
            | CanonicalStatus::AwaitingRemote
            | CanonicalStatus::DownloadingRemote => true,
            CanonicalStatus::Done
            | CanonicalStatus::Error
            | CanonicalStatus::RemoteError
            | CanonicalStatus::Unknown => !self.is_loaded(process_id),
        }
    }

    /// Resolve a log file name to the URL to fetch.
    ///
    /// Returns `None` for the sentinel, a missing name, or a relative name
    /// without a base URL. Absolute URLs and rooted paths are resolved the
    /// way a browser resolves a link against the base.
    pub fn resolve_log_url(&self, log_file: Option<&str>) -> Option<Url> {
        let name = log_file.map(str::trim).filter(|n| !n.is_empty())?;
        if name.eq_ignore_ascii_case(LOG_SENTINEL) {
            return None;
        }
        match &self.base_url {
            Some(base) => base.join(name).ok(),
            None => Url::parse(name).ok(),
        }
    }

    /// Bring the console of `descriptor` up to date.
    pub async fn refresh_if_needed<T, S>(
        &mut self,
        descriptor: &ProcessDescriptor,
        status: CanonicalStatus,
        response: &StatusResponse,
        transport: &T,
        surface: &mut S,
    ) -> RefreshOutcome
    where
        T: Transport + ?Sized,
        S: UiSurface + ?Sized,
    {
        match self.mode {
            LogMode::Entries => match &response.log {
                Some(entries) => {
                    let lines = entries.iter().map(|e| e.render()).collect();
                    self.render(descriptor, lines, surface)
                }
                None => RefreshOutcome::Skipped,
            },
            LogMode::File => {
                if !self.should_fetch(&descriptor.id, status) {
                    return RefreshOutcome::Skipped;
                }
                self.fetch_file(descriptor, transport, surface).await
            }
        }
    }

    /// Load the log file of `descriptor` if its console is still empty.
    ///
    /// Used when no status is known for this tick. Entries mode has nothing
    /// to fetch without a status response.
    pub async fn refresh_if_not_loaded<T, S>(
        &mut self,
        descriptor: &ProcessDescriptor,
        transport: &T,
        surface: &mut S,
    ) -> RefreshOutcome
    where
        T: Transport + ?Sized,
        S: UiSurface + ?Sized,
    {
        if self.mode != LogMode::File || self.is_loaded(&descriptor.id) {
            return RefreshOutcome::Skipped;
        }
        self.fetch_file(descriptor, transport, surface).await
    }

    async fn fetch_file<T, S>(
        &mut self,
        descriptor: &ProcessDescriptor,
        transport: &T,
        surface: &mut S,
    ) -> RefreshOutcome
    where
        T: Transport + ?Sized,
        S: UiSurface + ?Sized,
    {
        let Some(url) = self.resolve_log_url(descriptor.log_file.as_deref()) else {
            debug!(process_id = %descriptor.id, "Log file not available yet");
            return RefreshOutcome::Skipped;
        };
        match transport.fetch_log(&url).await {
            Ok(body) => self.render(descriptor, split_log(&body), surface),
            Err(error) => {
                warn!(process_id = %descriptor.id, %error, "Failed to fetch log");
                RefreshOutcome::Failed
            }
        }
    }

    fn render<S: UiSurface + ?Sized>(
        &mut self,
        descriptor: &ProcessDescriptor,
        lines: Vec<String>,
        surface: &mut S,
    ) -> RefreshOutcome {
        if self.lines(&descriptor.id) == lines.as_slice() {
            return RefreshOutcome::Unchanged;
        }
        surface.set_lines(&descriptor.ui.console_output, &lines);
        let count = lines.len();
        debug!(process_id = %descriptor.id, lines = count, "Console updated");
        self.consoles.insert(descriptor.id.clone(), lines);
        RefreshOutcome::Rendered(count)
    }
}

/// One console line per `\n`; nothing else in the body is touched.
fn split_log(body: &str) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('\n').map(str::to_string).collect()
}
