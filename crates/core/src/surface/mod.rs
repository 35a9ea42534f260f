//! The UI surface the engine writes to.
//!
//! A surface is a set of elements addressed by [`ElementId`]. The engine only
//! writes; it never reads element state back, so a surface can be a local
//! model ([`MemorySurface`]) or a channel to a front-end ([`ChannelSurface`]).

pub mod channel;
pub mod memory;

pub use channel::ChannelSurface;
pub use memory::{ElementState, MemorySurface};

use pw_protocol::ElementId;

/// Write access to the elements of a UI.
pub trait UiSurface: Send {
    /// Replace the text of `element`.
    fn set_text(&mut self, element: &ElementId, text: &str);

    /// Show or hide `element`.
    fn set_visible(&mut self, element: &ElementId, visible: bool);

    /// Replace the content of a multi-line element.
    fn set_lines(&mut self, element: &ElementId, lines: &[String]);

    /// Called once every request of a tick has settled.
    fn tick_completed(&mut self, _tick: u64) {}
}

impl<S: UiSurface + ?Sized> UiSurface for Box<S> {
    fn set_text(&mut self, element: &ElementId, text: &str) {
        (**self).set_text(element, text);
    }

    fn set_visible(&mut self, element: &ElementId, visible: bool) {
        (**self).set_visible(element, visible);
    }

    fn set_lines(&mut self, element: &ElementId, lines: &[String]) {
        (**self).set_lines(element, lines);
    }

    fn tick_completed(&mut self, tick: u64) {
        (**self).tick_completed(tick);
    }
}
