// ── Topology summary ──

use serde::{Deserialize, Serialize};

/// Counts reported by `GET /topology`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub time: Option<u64>,
    pub devices: u64,
    pub links: u64,
    pub clusters: u64,
}

/// One strongly-connected cluster from `GET /topology/clusters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i64,
    pub device_count: u64,
    pub link_count: u64,
    pub root: Option<String>,
}
