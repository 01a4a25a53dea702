// ── Snapshot metrics ──
//
// Counts and the throughput estimate derived once per refresh cycle.
//
// Throughput formula:
//   total_bytes = Σ flow byte counters (see `convert::flow_bytes`)
//   bits        = total_bytes × 8
//   value       = bits / divisor, divisor = 1024ⁿ (Kbps n=1, Mbps n=2, Gbps n=3)
//
// The counters are cumulative since each flow was installed, so this is a
// volume-based estimate rather than an instantaneous rate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::convert::flow_bytes;
use crate::model::{Device, EntityCollection};

/// Unit the throughput estimate is expressed in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ThroughputUnit {
    Kbps,
    #[default]
    Mbps,
    Gbps,
}

impl ThroughputUnit {
    /// Binary divisor from bits to this unit.
    pub fn divisor(self) -> u64 {
        match self {
            Self::Kbps => 1 << 10,
            Self::Mbps => 1 << 20,
            Self::Gbps => 1 << 30,
        }
    }
}

/// Throughput estimate for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub total_bytes: u64,
    pub bits: u64,
    pub unit: ThroughputUnit,
}

impl Throughput {
    /// Sum the byte counters of every flow record.
    pub fn from_flows(flows: &EntityCollection, unit: ThroughputUnit) -> Self {
        let total_bytes = flows
            .iter()
            .map(flow_bytes)
            .fold(0u64, u64::saturating_add);
        Self {
            total_bytes,
            bits: total_bytes.saturating_mul(8),
            unit,
        }
    }

    /// The estimate in [`Self::unit`].
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn value(&self) -> f64 {
        self.bits as f64 / self.unit.divisor() as f64
    }

    /// The same measurement re-expressed in another unit.
    pub fn in_unit(self, unit: ThroughputUnit) -> Self {
        Self { unit, ..self }
    }
}

impl std::fmt::Display for Throughput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.value(), self.unit)
    }
}

/// Per-cycle summary handed to presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub device_count: usize,
    pub host_count: usize,
    pub flow_count: usize,
    pub link_count: usize,
    /// Devices whose `available` flag is set.
    pub available_device_count: usize,
    /// Device count per reported type (`SWITCH`, `ROUTER`, ...).
    pub device_types: BTreeMap<String, usize>,
    pub throughput: Throughput,
    pub connected: bool,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// The four collections a snapshot is derived from.
pub struct Collections<'a> {
    pub devices: &'a EntityCollection,
    pub hosts: &'a EntityCollection,
    pub flows: &'a EntityCollection,
    pub links: &'a EntityCollection,
}

impl Snapshot {
    pub fn derive(
        collections: &Collections<'_>,
        unit: ThroughputUnit,
        connected: bool,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        let mut available_device_count = 0;
        let mut device_types = BTreeMap::new();
        for record in collections.devices.iter() {
            let device = Device::from(record);
            if device.available {
                available_device_count += 1;
            }
            *device_types.entry(device.type_label().to_owned()).or_insert(0) += 1;
        }

        Self {
            device_count: collections.devices.len(),
            host_count: collections.hosts.len(),
            flow_count: collections.flows.len(),
            link_count: collections.links.len(),
            available_device_count,
            device_types,
            throughput: Throughput::from_flows(collections.flows, unit),
            connected,
            refreshed_at: Some(refreshed_at),
        }
    }
}
