// onosdash-core: Polling aggregator between onosdash-api and consumers (CLI).

pub mod config;
pub mod convert;
pub mod error;
pub mod metrics;
pub mod model;
pub mod poller;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConfigHandle, ControllerConfig, DEFAULT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
pub use error::CoreError;
pub use metrics::{Snapshot, Throughput, ThroughputUnit};
pub use poller::{Poller, PollerHandle};
pub use store::{CycleOutcome, CyclePhase, DashboardState, DashboardStore};
pub use stream::StateStream;

pub use model::{
    Application, Cluster, ConnectPoint, Device, EntityCollection, EntityKind, Flow, Host, Link, Port,
    TopologySummary,
};

// Transport types consumers need to build a poller.
pub use onosdash_api::{ConnectionTest, Endpoint, ErrorKind, OnosClient, TransportConfig};
pub use onosdash_api::Error as ApiError;
