//! Detail view widget for displaying a process console with scrolling support.
//!
//! Shows the console lines of the selected process. Supports keyboard
//! navigation (j/k, PageUp/PageDown, g/G) and shows a scrollbar when the
//! console is longer than the view.

use crate::event::EventStatus;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Lines moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Widget for displaying a console with scrolling support.
pub struct DetailView {
    /// Current scroll offset (number of lines scrolled from the top).
    pub scroll_offset: usize,
}

impl DetailView {
    /// Create a new DetailView with scroll offset at the top.
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    /// Render the console of a process.
    ///
    /// # Arguments
    ///
    /// * `frame` - The ratatui frame to render to
    /// * `area` - The area to render within
    /// * `title` - Block title, usually the process id
    /// * `lines` - Console lines, `None` when no process is selected
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str, lines: Option<&[String]>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Console - {title}"));

        let text = match lines {
            Some([]) => "No output yet.".to_string(),
            Some(lines) => lines.join("\n"),
            None => "No process selected.".to_string(),
        };

        let total_lines = lines.map_or(0, <[String]>::len);
        let offset = self.visible_offset(total_lines);

        let paragraph = Paragraph::new(text)
            .block(block)
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));

        frame.render_widget(paragraph, area);

        let visible_lines = area.height.saturating_sub(2) as usize;

        if total_lines > visible_lines {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(total_lines)
                .viewport_content_length(visible_lines)
                .position(offset);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }

    /// Scroll offset clamped to a console of `total_lines` lines.
    ///
    /// The console may have been replaced by a shorter one since the offset
    /// was last set.
    pub fn visible_offset(&self, total_lines: usize) -> usize {
        self.scroll_offset.min(total_lines.saturating_sub(1))
    }

    /// Handle a scroll key.
    ///
    /// # Arguments
    ///
    /// * `key_event` - The key pressed
    /// * `max` - The maximum scroll offset (typically the number of lines)
    pub fn handle_key_event(&mut self, key_event: KeyEvent, max: usize) -> EventStatus {
        match key_event.code {
            KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Char('j') => self.scroll_down(max),
            KeyCode::PageUp => self.page_up(PAGE_SIZE),
            KeyCode::PageDown => self.page_down(PAGE_SIZE, max),
            KeyCode::Char('g') => self.scroll_to_top(),
            KeyCode::Char('G') => self.scroll_to_bottom(max),
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    /// Scroll up by one line.
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down by one line, stopping at `max`.
    pub fn scroll_down(&mut self, max: usize) {
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize, max: usize) {
        self.scroll_offset = (self.scroll_offset + page_size).min(max);
    }

    /// Reset scroll to the top.
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, max: usize) {
        self.scroll_offset = max;
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}
