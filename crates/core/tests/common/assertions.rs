//! Custom assertion helpers for surface state.

use pw_core::surface::MemorySurface;
use pw_protocol::UiRefs;

/// Assert the visibility of the start, download and profile overview
/// elements of `ui`.
#[allow(dead_code)]
pub fn assert_controls(
    surface: &MemorySurface,
    ui: &UiRefs,
    start: bool,
    download: bool,
    profile_overview: bool,
) {
    assert_eq!(
        surface.is_visible(&ui.start_button),
        Some(start),
        "start button visibility"
    );
    assert_eq!(
        surface.is_visible(&ui.download_button),
        Some(download),
        "download button visibility"
    );
    assert_eq!(
        surface.is_visible(&ui.profile_overview),
        Some(profile_overview),
        "profile overview visibility"
    );
}

/// Assert the console of `ui` shows exactly `expected`.
#[allow(dead_code)]
pub fn assert_console(surface: &MemorySurface, ui: &UiRefs, expected: &[&str]) {
    let lines: Vec<&str> = surface
        .lines(&ui.console_output)
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(lines, expected, "console content");
}
