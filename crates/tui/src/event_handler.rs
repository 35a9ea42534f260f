//! Event handling utilities for the TUI.
//!
//! This module provides functions for handling different types of events:
//! - Core events (surface writes from the poll loop)
//! - Keyboard events (user input)

use crate::app::ProcessPanel;
use crate::event::EventStatus;
use crate::widgets::DetailView;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use pw_core::surface::MemorySurface;
use pw_protocol::{Event, Op};
use tokio::sync::mpsc::UnboundedSender;

/// Apply an event received from the core.
///
/// Every completed tick refreshes `last_update`.
pub fn handle_core_event(
    surface: &mut MemorySurface,
    last_update: &mut Option<DateTime<Local>>,
    event: Event,
) {
    surface.apply(&event);
    if matches!(event, Event::TickCompleted { .. }) {
        *last_update = Some(Local::now());
    }
}

/// Handle a keyboard event from the user.
///
/// Scroll keys go to the console first; whatever it does not consume is
/// handled here.
///
/// Returns `true` if the application should exit, `false` otherwise.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    selected_index: &mut usize,
    console: &mut DetailView,
    panels: &[ProcessPanel],
    surface: &MemorySurface,
    op_tx: &UnboundedSender<Op>,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    let console_len = panels
        .get(*selected_index)
        .map_or(0, |p| surface.lines(&p.ui.console_output).len());
    if console.handle_key_event(key_event, console_len) == EventStatus::Consumed {
        return false;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            let _ = op_tx.send(Op::Shutdown);
            return true;
        }
        KeyCode::Char('r') => {
            let _ = op_tx.send(Op::PollNow);
        }
        KeyCode::Up => {
            if *selected_index > 0 {
                *selected_index -= 1;
                console.scroll_to_top();
            }
        }
        KeyCode::Down => {
            if *selected_index < panels.len().saturating_sub(1) {
                *selected_index += 1;
                console.scroll_to_top();
            }
        }
        _ => {}
    }

    false
}
