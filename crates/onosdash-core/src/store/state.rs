// ── Published dashboard state ──

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use onosdash_api::ErrorKind;

use crate::metrics::Snapshot;
use crate::model::EntityKind;

/// Where the poller is in its refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    #[default]
    Idle,
    Fetching,
}

/// How a refresh cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Every fetch succeeded.
    Success,
    /// Some fetches failed and were replaced by empty collections.
    PartialFailure { failed: Vec<EntityKind> },
    /// The cycle could not run at all; previous data was kept.
    TotalFailure { kind: ErrorKind, message: String },
}

/// Everything presentation layers consume, replaced whole once per cycle.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub snapshot: Snapshot,
    pub devices: Arc<Vec<Value>>,
    pub hosts: Arc<Vec<Value>>,
    pub flows: Arc<Vec<Value>>,
    pub links: Arc<Vec<Value>>,
    /// Raw `GET /topology` body; `None` until one succeeds or after it fails.
    pub topology: Option<Value>,
    /// `true` until the first cycle settles.
    pub is_loading: bool,
    /// Human-readable reason the last cycle could not run.
    pub error: Option<String>,
    /// Sequence number of the cycle that produced this state (0 = none yet).
    pub cycle: u64,
    pub last_outcome: Option<CycleOutcome>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            snapshot: Snapshot::default(),
            devices: Arc::default(),
            hosts: Arc::default(),
            flows: Arc::default(),
            links: Arc::default(),
            topology: None,
            is_loading: true,
            error: None,
            cycle: 0,
            last_outcome: None,
        }
    }
}

impl DashboardState {
    pub fn connected(&self) -> bool {
        self.snapshot.connected
    }
}
