//! UI surface models.
//!
//! The engine never touches widgets directly. It addresses elements of the
//! host surface by id, the same ids the web page gives its DOM nodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Identifier of one element on the UI surface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The elements owned by one tracked process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct UiRefs {
    /// Text element showing the current status message.
    pub status_message: ElementId,

    /// The start/continue control.
    pub start_button: ElementId,

    /// The results download control.
    pub download_button: ElementId,

    /// Panel listing the profiles a process can be started with.
    pub profile_overview: ElementId,

    /// Console output area.
    pub console_output: ElementId,
}

impl UiRefs {
    /// Element ids of a single-process status page.
    pub fn legacy() -> Self {
        Self {
            status_message: "process_status_message".into(),
            start_button: "process-continue-button".into(),
            download_button: "process_download_button".into(),
            profile_overview: "process_profile_overview".into(),
            console_output: "console_output".into(),
        }
    }

    /// Element ids for an explicitly registered process, suffixed with its id.
    pub fn for_process(process_id: &str) -> Self {
        let legacy = Self::legacy();
        let suffixed = |element: ElementId| ElementId(format!("{element}-{process_id}"));
        Self {
            status_message: suffixed(legacy.status_message),
            start_button: suffixed(legacy.start_button),
            download_button: suffixed(legacy.download_button),
            profile_overview: suffixed(legacy.profile_overview),
            console_output: suffixed(legacy.console_output),
        }
    }

    /// All element ids in a fixed order.
    pub fn all(&self) -> [&ElementId; 5] {
        [
            &self.status_message,
            &self.start_button,
            &self.download_button,
            &self.profile_overview,
            &self.console_output,
        ]
    }
}
