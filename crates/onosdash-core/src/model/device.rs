// ── Device view ──

use serde::{Deserialize, Serialize};

/// A network switch known to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    /// `SWITCH`, `ROUTER`, ... as reported by the controller.
    pub device_type: Option<String>,
    pub available: bool,
    pub role: Option<String>,
    pub manufacturer: Option<String>,
    pub hardware: Option<String>,
    pub software: Option<String>,
    pub serial: Option<String>,
    pub driver: Option<String>,
    pub chassis_id: Option<String>,
}

impl Device {
    /// Type label with the controller's implicit default.
    pub fn type_label(&self) -> &str {
        self.device_type.as_deref().unwrap_or("SWITCH")
    }
}

/// One port on a device, from `GET /devices/{id}/ports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub element: Option<String>,
    pub port: String,
    pub is_enabled: bool,
    pub port_type: Option<String>,
    pub port_speed: Option<u64>,
    pub name: Option<String>,
}
