//! Per-process poll state machine.
//!
//! Every tracked process cycles through
//! `Idle -> Requesting -> Reconciling -> Idle`. Requests are stamped with a
//! per-process sequence number; a response is only applied if its stamp is
//! newer than the last applied one.

use crate::transport::TransportError;
use pw_protocol::CanonicalStatus;
use tracing::{info, warn};

/// Where a process is in its poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    /// Waiting for the next tick.
    #[default]
    Idle,

    /// A status request is in flight.
    Requesting,

    /// A response is being applied to the surface.
    Reconciling,
}

/// Poll bookkeeping of one process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorState {
    pub phase: PollPhase,

    /// Stamp of the most recently issued request.
    pub issued: u64,

    /// Stamp of the most recently applied response.
    pub applied: u64,

    /// Status of the last applied response.
    pub last_status: Option<CanonicalStatus>,

    /// Consecutive failed requests.
    pub failures: u32,
}

/// Move to `Requesting` and stamp the new request.
///
/// # Returns
///
/// The stamp to hand back to [`begin_reconcile`] with the response.
pub fn begin_request(state: &mut DescriptorState) -> u64 {
    state.issued += 1;
    state.phase = PollPhase::Requesting;
    state.issued
}

/// Move to `Reconciling` if the response stamped `stamp` is newer than
/// the last applied one.
///
/// # Returns
///
/// `false` for a stale response; the state is then back to `Idle` and the
/// response must be dropped.
pub fn begin_reconcile(state: &mut DescriptorState, stamp: u64) -> bool {
    if stamp <= state.applied {
        state.phase = PollPhase::Idle;
        return false;
    }
    state.applied = stamp;
    state.phase = PollPhase::Reconciling;
    true
}

/// Record the status of an applied response.
///
/// # Arguments
///
/// * `state` - State of the process
/// * `process_id` - Id used in log events
/// * `status` - Decoded status of the response
pub fn record_status(state: &mut DescriptorState, process_id: &str, status: CanonicalStatus) {
    if state.last_status != Some(status) {
        info!(process_id, ?status, previous = ?state.last_status, "Process status changed");
    }
    state.last_status = Some(status);
    state.failures = 0;
}

/// Record a failed request and return to `Idle`.
///
/// # Returns
///
/// The number of consecutive failures.
pub fn record_failure(state: &mut DescriptorState, process_id: &str, error: &TransportError) -> u32 {
    state.failures += 1;
    state.phase = PollPhase::Idle;
    warn!(
        process_id,
        %error,
        failures = state.failures,
        "Error while getting information about process"
    );
    state.failures
}

/// Return to `Idle` once reconciliation is done.
pub fn finish(state: &mut DescriptorState) {
    state.phase = PollPhase::Idle;
}
