//! # pw-tui
//!
//! Terminal dashboard for procwatch.
//!
//! The TUI mirrors the element writes of `pw-core` and renders them as a
//! process table with a console. It talks to the core only through the
//! `Op` and `Event` channels defined in `pw-protocol`.

pub mod app;
pub mod event;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::{App, ProcessPanel};
pub use tui::Tui;

use pw_protocol::{Event, Op};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Run the dashboard until the user quits or the core stops.
///
/// # Arguments
///
/// * `panels` - Processes to show, in registration order
/// * `op_tx` - Channel to the poll loop
/// * `event_rx` - Element writes coming from the poll loop
pub async fn run_app(
    panels: Vec<ProcessPanel>,
    op_tx: UnboundedSender<Op>,
    event_rx: UnboundedReceiver<Event>,
) -> anyhow::Result<()> {
    let mut tui = Tui::init()?;
    let mut app = App::new(panels, op_tx, event_rx);

    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}
