//! TUI application state and event loop.
//!
//! This module defines the main `App` struct that mirrors the engine's
//! surface and runs the event loop using `tokio::select!`.

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use pw_core::registry::ProcessRegistry;
use pw_core::surface::MemorySurface;
use pw_protocol::{Event, Op, UiRefs};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;

use crate::event_handler;
use crate::tui::{Tui, TuiEvent};
use crate::widgets::{render_dashboard, DetailView};

/// A tracked process and the elements it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPanel {
    pub id: String,
    pub ui: UiRefs,
}

impl ProcessPanel {
    /// One panel per registered process, in registration order.
    pub fn from_registry(registry: &ProcessRegistry) -> Vec<Self> {
        registry
            .iter()
            .map(|d| ProcessPanel {
                id: d.id.clone(),
                ui: d.ui.clone(),
            })
            .collect()
    }
}

/// Main TUI application state.
pub struct App {
    /// Processes shown on the dashboard.
    pub panels: Vec<ProcessPanel>,
    /// Element state as written by the engine.
    pub surface: MemorySurface,
    /// Index of the currently selected process.
    pub selected_index: usize,
    /// Console of the selected process.
    pub console: DetailView,
    /// When the engine last completed a tick.
    pub last_update: Option<DateTime<Local>>,
    /// Channel to send operations to the core.
    pub op_tx: UnboundedSender<Op>,
    /// Channel to receive events from the core.
    pub event_rx: UnboundedReceiver<Event>,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    /// Create a new App with communication channels.
    pub fn new(
        panels: Vec<ProcessPanel>,
        op_tx: UnboundedSender<Op>,
        event_rx: UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            panels,
            surface: MemorySurface::new(),
            selected_index: 0,
            console: DetailView::new(),
            last_update: None,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle keyboard input and core events concurrently.
    /// Exits on quit or once the core stops sending events.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();

        tui.frame_requester().schedule_frame();

        while !self.should_exit {
            select! {
                event = self.event_rx.recv() => match event {
                    Some(event) => {
                        self.handle_core_event(event);
                        tui.frame_requester().schedule_frame();
                    }
                    None => self.should_exit = true,
                },
                Some(tui_event) = tui_events.next() => {
                    self.handle_tui_event(tui, tui_event)?;
                }
            }
        }

        Ok(())
    }

    /// Handle events from the core.
    fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(&mut self.surface, &mut self.last_update, event);
    }

    /// Handle TUI events (keyboard input, resize, draw).
    fn handle_tui_event(&mut self, tui: &mut Tui, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key_event) => {
                self.handle_key_event(key_event);
                tui.frame_requester().schedule_frame();
            }
            TuiEvent::Draw => {
                tui.draw(|frame| {
                    self.render(frame);
                })?;
            }
        }
        Ok(())
    }

    /// Handle keyboard events.
    fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.should_exit = event_handler::handle_keyboard_event(
            key_event,
            &mut self.selected_index,
            &mut self.console,
            &self.panels,
            &self.surface,
            &self.op_tx,
        );
    }

    /// Render the TUI.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Dashboard (top), console (middle), footer (bottom)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        render_dashboard(
            frame,
            chunks[0],
            &self.panels,
            &self.surface,
            self.selected_index,
        );
        self.render_console(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
    }

    /// Render the console of the selected process.
    fn render_console(&self, frame: &mut Frame, area: Rect) {
        match self.panels.get(self.selected_index) {
            Some(panel) => {
                let lines = self.surface.lines(&panel.ui.console_output);
                self.console.render(frame, area, &panel.id, Some(lines));
            }
            None => self.console.render(frame, area, "-", None),
        }
    }

    /// Render the key help and the time of the last completed tick.
    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let updated = match self.last_update {
            Some(at) => format!("Last update {}", at.format("%H:%M:%S")),
            None => "Waiting for first poll".to_string(),
        };

        let block = Block::default().borders(Borders::ALL).title(updated);
        let paragraph = Paragraph::new("q quit | r poll now | Up/Down select | j/k scroll")
            .block(block)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(paragraph, area);
    }
}
