//! In-memory surface model.
//!
//! Keeps the state every element would have on screen. Front-ends render from
//! it and tests assert against it.

use crate::surface::UiSurface;
use pw_protocol::{ElementId, Event};
use std::collections::HashMap;

/// State of a single element.
///
/// `visible` is `None` until the engine has toggled the element, mirroring a
/// DOM node whose display style was never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    pub text: Option<String>,
    pub visible: Option<bool>,
    pub lines: Vec<String>,
}

/// Surface that stores element state in a map.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<ElementId, ElementState>,
    writes: usize,
    last_tick: Option<u64>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event received from the engine.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::SetText { element, text } => self.set_text(element, text),
            Event::SetVisible { element, visible } => self.set_visible(element, *visible),
            Event::SetLines { element, lines } => self.set_lines(element, lines),
            Event::TickCompleted { tick } => self.tick_completed(*tick),
        }
    }

    pub fn element(&self, element: &ElementId) -> Option<&ElementState> {
        self.elements.get(element)
    }

    pub fn text(&self, element: &ElementId) -> Option<&str> {
        self.element(element).and_then(|e| e.text.as_deref())
    }

    pub fn is_visible(&self, element: &ElementId) -> Option<bool> {
        self.element(element).and_then(|e| e.visible)
    }

    pub fn lines(&self, element: &ElementId) -> &[String] {
        self.element(element)
            .map(|e| e.lines.as_slice())
            .unwrap_or_default()
    }

    /// Number of element writes applied so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    fn entry(&mut self, element: &ElementId) -> &mut ElementState {
        self.writes += 1;
        self.elements.entry(element.clone()).or_default()
    }
}

impl UiSurface for MemorySurface {
    fn set_text(&mut self, element: &ElementId, text: &str) {
        self.entry(element).text = Some(text.to_string());
    }

    fn set_visible(&mut self, element: &ElementId, visible: bool) {
        self.entry(element).visible = Some(visible);
    }

    fn set_lines(&mut self, element: &ElementId, lines: &[String]) {
        self.entry(element).lines = lines.to_vec();
    }

    fn tick_completed(&mut self, tick: u64) {
        self.last_tick = Some(tick);
    }
}
