//! Communication protocol between the engine and a UI front-end.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: requests sent from the UI to the engine
//! - `Event`: surface mutations sent from the engine to the UI
//!
//! The engine only ever writes to the surface, so the UI can apply events
//! blindly in arrival order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ui_models::ElementId;

/// Operations sent from the UI to the engine.
///
/// ```json
/// { "type": "pollNow" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Run the next tick now instead of waiting for the poll interval.
    ///
    /// Ignored while a tick is in flight.
    PollNow,

    /// Stop polling.
    Shutdown,
}

/// Surface mutations sent from the engine to the UI.
///
/// ```json
/// {
///   "type": "setVisible",
///   "payload": { "element": "process_download_button", "visible": true }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// Replace the text of an element.
    SetText { element: ElementId, text: String },

    /// Show or hide an element.
    SetVisible { element: ElementId, visible: bool },

    /// Replace the content of a multi-line element, one entry per line.
    SetLines {
        element: ElementId,
        lines: Vec<String>,
    },

    /// A full poll round has settled.
    TickCompleted { tick: u64 },
}
