//! Surface that forwards every write to a front-end over a channel.

use crate::surface::UiSurface;
use pw_protocol::{ElementId, Event};
use tokio::sync::mpsc::UnboundedSender;

/// Sends [`Event`]s to whoever owns the receiving end.
///
/// A closed channel means the front-end is gone; writes are then dropped.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    events_tx: UnboundedSender<Event>,
}

impl ChannelSurface {
    pub fn new(events_tx: UnboundedSender<Event>) -> Self {
        Self { events_tx }
    }

    fn send(&self, event: Event) {
        let _ = self.events_tx.send(event);
    }
}

impl UiSurface for ChannelSurface {
    fn set_text(&mut self, element: &ElementId, text: &str) {
        self.send(Event::SetText {
            element: element.clone(),
            text: text.to_string(),
        });
    }

    fn set_visible(&mut self, element: &ElementId, visible: bool) {
        self.send(Event::SetVisible {
            element: element.clone(),
            visible,
        });
    }

    fn set_lines(&mut self, element: &ElementId, lines: &[String]) {
        self.send(Event::SetLines {
            element: element.clone(),
            lines: lines.to_vec(),
        });
    }

    fn tick_completed(&mut self, tick: u64) {
        self.send(Event::TickCompleted { tick });
    }
}
