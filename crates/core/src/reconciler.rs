//! Projection of a canonical status onto a process's UI affordances.
//!
//! Reconciliation is a pure function of its inputs: it writes the status
//! text and the visibility of the start, download and profile overview
//! elements, and nothing else. Log content is handled by the
//! [`LogTailer`](crate::tailer::LogTailer).

use crate::registry::ProcessDescriptor;
use crate::surface::UiSurface;
use pw_protocol::CanonicalStatus;

/// Which affordances are shown for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub start: bool,
    pub download: bool,
    pub profile_overview: bool,
}

/// Applies decoded statuses to the surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiReconciler {
    rerun_after_done: bool,
}

impl UiReconciler {
    /// Create a reconciler.
    ///
    /// # Arguments
    ///
    /// * `rerun_after_done` - Keep the start control visible on `Done`
    pub fn new(rerun_after_done: bool) -> Self {
        Self { rerun_after_done }
    }

    /// The visibility table.
    pub fn visibility(&self, status: CanonicalStatus) -> Visibility {
        match status {
            CanonicalStatus::Ready => Visibility {
                start: true,
                download: false,
                profile_overview: true,
            },
            CanonicalStatus::Done => Visibility {
                start: self.rerun_after_done,
                download: true,
                profile_overview: false,
            },
            CanonicalStatus::Uploading
            | CanonicalStatus::Running
            | CanonicalStatus::AwaitingRemote
            | CanonicalStatus::DownloadingRemote
            | CanonicalStatus::Error
            | CanonicalStatus::RemoteError
            | CanonicalStatus::Unknown => Visibility {
                start: false,
                download: false,
                profile_overview: false,
            },
        }
    }

    /// Write `message` and the visibility for `status` to the elements of
    /// `descriptor`.
    pub fn reconcile<S: UiSurface + ?Sized>(
        &self,
        descriptor: &ProcessDescriptor,
        status: CanonicalStatus,
        message: &str,
        surface: &mut S,
    ) {
        let visibility = self.visibility(status);
        let ui = &descriptor.ui;

        surface.set_text(&ui.status_message, message);
        surface.set_visible(&ui.start_button, visibility.start);
        surface.set_visible(&ui.download_button, visibility.download);
        surface.set_visible(&ui.profile_overview, visibility.profile_overview);
    }
}
