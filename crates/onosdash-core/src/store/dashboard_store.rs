// ── Dashboard store ──
//
// Single-writer holder for the latest `DashboardState`. The poller is the
// only writer; every mutation goes out through a `watch` channel as one
// whole value, so subscribers never observe a half-built cycle.

use std::sync::Arc;

use tokio::sync::watch;

use super::state::{CycleOutcome, CyclePhase, DashboardState};
use crate::stream::StateStream;

pub struct DashboardStore {
    state: watch::Sender<Arc<DashboardState>>,
    phase: watch::Sender<CyclePhase>,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(DashboardState::default()));
        let (phase, _) = watch::channel(CyclePhase::Idle);
        Self { state, phase }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The latest published state (cheap `Arc` clone).
    pub fn current(&self) -> Arc<DashboardState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    pub fn phase(&self) -> CyclePhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<CyclePhase> {
        self.phase.subscribe()
    }

    // ── Writes (poller only) ─────────────────────────────────────────

    pub(crate) fn set_phase(&self, phase: CyclePhase) {
        self.phase.send_replace(phase);
    }

    /// Replace the whole state with a freshly assembled cycle result.
    pub(crate) fn publish(&self, state: DashboardState) {
        self.state.send_replace(Arc::new(state));
    }

    /// Record a cycle that could not run: flip the connection flag and
    /// surface the message, keeping the previously displayed data.
    pub(crate) fn record_failure(&self, cycle: u64, message: String, outcome: CycleOutcome) {
        self.state.send_modify(|current| {
            let mut next = DashboardState::clone(current);
            next.snapshot.connected = false;
            next.is_loading = false;
            next.error = Some(message);
            next.cycle = cycle;
            next.last_outcome = Some(outcome);
            *current = Arc::new(next);
        });
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}
