// ── Flow view ──

use serde::{Deserialize, Serialize};

/// An installed forwarding rule with its counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub device_id: Option<String>,
    pub app_id: Option<String>,
    pub table_id: Option<i64>,
    pub priority: i64,
    pub timeout: i64,
    pub is_permanent: bool,
    pub state: Option<String>,
    pub bytes: u64,
    pub packets: u64,
    pub life: u64,
}
