//! Translation of raw status codes into canonical statuses and messages.

use pw_protocol::{CanonicalStatus, StatusDialect};

/// Decodes raw status codes of one endpoint dialect.
///
/// Decoding is total: any integer the server may send maps to exactly one
/// [`CanonicalStatus`], with unrecognized codes mapping to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCodec {
    dialect: StatusDialect,
}

impl StatusCodec {
    pub fn new(dialect: StatusDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> StatusDialect {
        self.dialect
    }

    /// Map a raw server code to its canonical status.
    pub fn decode(&self, raw: i64) -> CanonicalStatus {
        match self.dialect {
            StatusDialect::Pipeline => match raw {
                0 => CanonicalStatus::Ready,
                1 => CanonicalStatus::Uploading,
                2 => CanonicalStatus::Running,
                3 => CanonicalStatus::AwaitingRemote,
                4 => CanonicalStatus::DownloadingRemote,
                5 => CanonicalStatus::Done,
                -1 => CanonicalStatus::Error,
                -2 => CanonicalStatus::RemoteError,
                _ => CanonicalStatus::Unknown,
            },
            StatusDialect::Staged => match raw {
                0 => CanonicalStatus::Ready,
                1 => CanonicalStatus::Running,
                2 => CanonicalStatus::DownloadingRemote,
                3 => CanonicalStatus::Done,
                -1 => CanonicalStatus::Error,
                _ => CanonicalStatus::Unknown,
            },
        }
    }

    /// The text shown for `status`.
    ///
    /// A non-blank server message wins over the static default.
    pub fn message_for(status: CanonicalStatus, server_message: Option<&str>) -> String {
        server_message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| Self::default_message(status))
            .to_string()
    }

    pub fn default_message(status: CanonicalStatus) -> &'static str {
        match status {
            CanonicalStatus::Ready => "Ready to start",
            CanonicalStatus::Uploading => "Uploading files",
            CanonicalStatus::Running => "Running",
            CanonicalStatus::AwaitingRemote => "Waiting for download from the processing server",
            CanonicalStatus::DownloadingRemote => "Downloading files from the processing server",
            CanonicalStatus::Done => "Done",
            CanonicalStatus::Error => "An error occurred, please try again later",
            CanonicalStatus::RemoteError => {
                "An error occurred while downloading files from the processing server, please try again"
            }
            CanonicalStatus::Unknown => "Server returned an unknown status code",
        }
    }
}
