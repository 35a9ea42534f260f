//! Dashboard widget for displaying tracked processes in a table.
//!
//! One row per process: its id, the status text the engine wrote and a badge
//! for every control the engine made visible.

use crate::app::ProcessPanel;
use pw_core::surface::MemorySurface;
use ratatui::layout::Constraint;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Cell;
use ratatui::widgets::Row;
use ratatui::widgets::Table;
use ratatui::widgets::TableState;
use ratatui::Frame;

/// Status text shown before the first response arrived.
pub const WAITING_TEXT: &str = "Waiting for status...";

/// Renders the dashboard as a table showing all processes.
///
/// # Arguments
/// * `frame` - The frame to render into
/// * `area` - The area to render the table in
/// * `panels` - The tracked processes, in registration order
/// * `surface` - Element state written by the engine
/// * `selected` - Index of the currently selected process
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    panels: &[ProcessPanel],
    surface: &MemorySurface,
    selected: usize,
) {
    let rows: Vec<Row> = panels
        .iter()
        .map(|panel| {
            let status = surface.text(&panel.ui.status_message);
            let status_style = match status {
                Some(_) => Style::default().fg(Color::White),
                None => Style::default().fg(Color::DarkGray),
            };

            Row::new(vec![
                Cell::from(panel.id.clone()),
                Cell::from(status.unwrap_or(WAITING_TEXT).to_string()).style(status_style),
                Cell::from(control_badges(panel, surface)),
            ])
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("Process"),
        Cell::from("Status"),
        Cell::from("Controls"),
    ])
    .style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Length(16),
        Constraint::Percentage(55),
        Constraint::Min(24),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Processes")
                .style(Style::default().fg(Color::White)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !panels.is_empty() {
        table_state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

/// One colored badge per visible control.
fn control_badges(panel: &ProcessPanel, surface: &MemorySurface) -> Line<'static> {
    let badges = [
        (&panel.ui.start_button, "start", Color::Green),
        (&panel.ui.download_button, "download", Color::Cyan),
        (&panel.ui.profile_overview, "profiles", Color::Yellow),
    ];

    let spans: Vec<Span> = badges
        .into_iter()
        .filter(|(element, _, _)| surface.is_visible(element) == Some(true))
        .map(|(_, label, color)| Span::styled(format!("[{label}] "), Style::default().fg(color)))
        .collect();

    Line::from(spans)
}
