// ── Domain model ──
//
// Raw collections plus lenient, display-oriented views over controller
// records. Views never fail: absent or mistyped fields become defaults.

pub mod application;
pub mod device;
pub mod entity;
pub mod flow;
pub mod host;
pub mod link;
pub mod topology;

pub use application::Application;
pub use device::{Device, Port};
pub use entity::{EntityCollection, EntityKind};
pub use flow::Flow;
pub use host::{ConnectPoint, Host};
pub use link::Link;
pub use topology::{Cluster, TopologySummary};
