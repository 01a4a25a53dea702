// ── Reactive dashboard store ──
//
// Latest-value storage with push-based change notification.

mod dashboard_store;
mod state;

pub use dashboard_store::DashboardStore;
pub use state::{CycleOutcome, CyclePhase, DashboardState};
