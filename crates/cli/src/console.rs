//! Plain-terminal surface for `--headless` runs.
//!
//! Every element write becomes one colored line on the writer. Console
//! elements only print the lines that were appended since the last write.
//!
//! Once a write fails the surface goes quiet: the error is logged once and
//! [`ConsoleSurface::closed`] is notified so the caller can stop polling.

use colored::Colorize;
use pw_core::surface::UiSurface;
use pw_protocol::ElementId;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::warn;

pub struct ConsoleSurface<W: Write + Send> {
    out: W,
    printed: HashMap<ElementId, Vec<String>>,
    failed: bool,
    closed: Arc<Notify>,
}

impl<W: Write + Send> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: HashMap::new(),
            failed: false,
            closed: Arc::new(Notify::new()),
        }
    }

    /// Notified when the output can no longer be written.
    pub fn closed(&self) -> Arc<Notify> {
        Arc::clone(&self.closed)
    }

    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        if self.failed {
            return;
        }
        if let Err(error) = self.out.write_fmt(format_args!("{line}\n")) {
            warn!(%error, "Output closed, no further changes will be printed");
            self.failed = true;
            self.closed.notify_one();
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> UiSurface for ConsoleSurface<W> {
    fn set_text(&mut self, element: &ElementId, text: &str) {
        self.write_line(format_args!("{} {}", element.as_str().bold(), text));
    }

    fn set_visible(&mut self, element: &ElementId, visible: bool) {
        let state = if visible {
            "shown".green()
        } else {
            "hidden".dimmed()
        };
        self.write_line(format_args!("{} {}", element.as_str().bold(), state));
    }

    fn set_lines(&mut self, element: &ElementId, lines: &[String]) {
        let previous = self.printed.get(element).map_or(0, |p| {
            if lines.starts_with(p) {
                p.len()
            } else {
                0
            }
        });

        for line in &lines[previous..] {
            self.write_line(format_args!("{} {}", element.as_str().cyan(), line));
        }
        self.printed.insert(element.clone(), lines.to_vec());
    }
}
