// onosdash-api: Async Rust client for the ONOS controller REST API

pub mod client;
pub mod endpoint;
pub mod error;
pub mod transport;

pub use client::{ConnectionTest, OnosClient};
pub use endpoint::Endpoint;
pub use error::{Error, ErrorKind};
pub use transport::TransportConfig;

// Re-exported so downstream crates can name request methods without a direct reqwest dep.
pub use reqwest::Method;
