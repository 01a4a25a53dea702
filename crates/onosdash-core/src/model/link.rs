// ── Link view ──

use serde::{Deserialize, Serialize};

use super::host::ConnectPoint;

/// An infrastructure link between two device ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub src: ConnectPoint,
    pub dst: ConnectPoint,
    pub link_type: Option<String>,
    pub state: Option<String>,
}
