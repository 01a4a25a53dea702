// ── Host view ──

use serde::{Deserialize, Serialize};

/// An end terminal discovered by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub mac: Option<String>,
    pub vlan: Option<String>,
    pub ip_addresses: Vec<String>,
    pub locations: Vec<ConnectPoint>,
}

/// A `(device, port)` attachment point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectPoint {
    pub device: String,
    pub port: String,
}

impl std::fmt::Display for ConnectPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.device, self.port)
    }
}
