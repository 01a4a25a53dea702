// ── Application view ──

use serde::{Deserialize, Serialize};

/// An application installed on the controller, from `GET /applications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: Option<u64>,
    pub name: String,
    pub version: Option<String>,
    /// `ACTIVE` or `INSTALLED`.
    pub state: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
}

impl Application {
    pub fn is_active(&self) -> bool {
        self.state.as_deref() == Some("ACTIVE")
    }
}
