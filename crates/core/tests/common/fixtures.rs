//! Test fixtures for page configurations and status responses.

use pw_core::config::models::{LogMode, PageConfig, ProcessConfig};
use pw_core::scheduler::PollScheduler;
use pw_core::surface::MemorySurface;
use pw_core::transport::MockTransport;
use pw_protocol::{LogEntry, StatusDialect, StatusResponse};

/// Status endpoint of the single-process fixture page.
#[allow(dead_code)]
pub const STATUS_URL: &str = "http://localhost:8000/scripts/process/1/status";

/// Base URL log files of the fixture page are resolved against.
#[allow(dead_code)]
pub const LOG_BASE_URL: &str = "http://localhost:8000/scripts/process/1/";

/// A single-process page in entries mode.
#[allow(dead_code)]
pub fn page_config() -> PageConfig {
    PageConfig {
        csrf_token: Some("test-token".to_string()),
        status_url: Some(STATUS_URL.to_string()),
        ..Default::default()
    }
}

/// A single-process page in file mode whose log lives at `log_file`.
#[allow(dead_code)]
pub fn file_mode_config(log_file: &str) -> PageConfig {
    PageConfig {
        log_mode: LogMode::File,
        log_base_url: Some(LOG_BASE_URL.to_string()),
        log_file: Some(log_file.to_string()),
        ..page_config()
    }
}

/// A single-process page speaking the staged dialect.
#[allow(dead_code)]
pub fn staged_config() -> PageConfig {
    PageConfig {
        dialect: StatusDialect::Staged,
        ..page_config()
    }
}

/// A multi-process page; each id gets `http://localhost:8000/<id>/status`.
#[allow(dead_code)]
pub fn multi_process_config(ids: &[&str]) -> PageConfig {
    PageConfig {
        csrf_token: Some("test-token".to_string()),
        processes: ids
            .iter()
            .map(|id| ProcessConfig {
                id: id.to_string(),
                status_url: process_url(id),
                log_file: None,
                poll_interval_ms: None,
                ui: Default::default(),
            })
            .collect(),
        ..Default::default()
    }
}

/// Status URL of process `id` in [`multi_process_config`].
#[allow(dead_code)]
pub fn process_url(id: &str) -> String {
    format!("http://localhost:8000/{id}/status")
}

/// A bare status response.
#[allow(dead_code)]
pub fn status(code: i64) -> StatusResponse {
    StatusResponse {
        status: code,
        ..Default::default()
    }
}

/// A status response carrying log entries.
#[allow(dead_code)]
pub fn status_with_log(code: i64, entries: &[(&str, &str)]) -> StatusResponse {
    StatusResponse {
        status: code,
        log: Some(
            entries
                .iter()
                .map(|(time, message)| LogEntry {
                    time: time.to_string(),
                    message: message.to_string(),
                })
                .collect(),
        ),
        ..Default::default()
    }
}

/// Build a scheduler writing to a fresh in-memory surface.
#[allow(dead_code)]
pub fn scheduler(
    config: &PageConfig,
    transport: &MockTransport,
) -> PollScheduler<MockTransport, MemorySurface> {
    PollScheduler::from_config(config, transport.clone(), MemorySurface::new())
        .expect("Failed to build scheduler")
}
