//! Event handling types for the TUI.
//!
//! Widgets return [`EventStatus`] from their `handle_key_event` methods so the
//! app can offer a key to each handler in turn.

/// Status of an event after being handled by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// The event was handled by the widget and should not be propagated further.
    Consumed,
    /// The event was not handled by the widget and should be passed to the next handler.
    NotConsumed,
}
