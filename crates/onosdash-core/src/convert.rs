// ── Record-to-view conversions ──
//
// Bridges raw controller JSON into the display views in `model`. The
// controller's field set drifts across releases, so every accessor is
// lenient: numbers may arrive as strings, optional fields may vanish.

use serde_json::Value;

use crate::model::{
    Application, Cluster, ConnectPoint, Device, Flow, Host, Link, Port, TopologySummary,
};

// ── Helpers ────────────────────────────────────────────────────────

/// A string field; numbers and booleans are stringified.
fn text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A non-negative integer field, accepting numeric strings and floats.
pub(crate) fn unsigned(record: &Value, key: &str) -> Option<u64> {
    match record.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(float_to_u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn signed(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(record: &Value, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn strings(record: &Value, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn float_to_u64(f: f64) -> u64 {
    // Saturating: values beyond u64::MAX clamp.
    f.floor() as u64
}

fn connect_point(value: &Value) -> Option<ConnectPoint> {
    // Links use `device`, host locations use `elementId`.
    let device = text(value, "device").or_else(|| text(value, "elementId"))?;
    Some(ConnectPoint {
        device,
        port: text(value, "port").unwrap_or_default(),
    })
}

fn missing_point() -> ConnectPoint {
    ConnectPoint {
        device: String::new(),
        port: String::new(),
    }
}

// ── Views ──────────────────────────────────────────────────────────

impl From<&Value> for Device {
    fn from(record: &Value) -> Self {
        let annotations = record.get("annotations").unwrap_or(&Value::Null);
        Self {
            id: text(record, "id").unwrap_or_default(),
            device_type: text(record, "type"),
            available: flag(record, "available").unwrap_or(false),
            role: text(record, "role"),
            manufacturer: text(record, "mfr"),
            hardware: text(record, "hw"),
            software: text(record, "sw"),
            serial: text(record, "serial"),
            driver: text(record, "driver").or_else(|| text(annotations, "driver")),
            chassis_id: text(record, "chassisId"),
        }
    }
}

impl From<&Value> for Port {
    fn from(record: &Value) -> Self {
        let annotations = record.get("annotations").unwrap_or(&Value::Null);
        Self {
            element: text(record, "element"),
            port: text(record, "port").unwrap_or_default(),
            is_enabled: flag(record, "isEnabled").unwrap_or(false),
            port_type: text(record, "type"),
            port_speed: unsigned(record, "portSpeed"),
            name: text(annotations, "portName"),
        }
    }
}

impl From<&Value> for Host {
    fn from(record: &Value) -> Self {
        // Older controllers report a single `location` object.
        let mut locations: Vec<ConnectPoint> = record
            .get("locations")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(connect_point).collect())
            .unwrap_or_default();
        if locations.is_empty() {
            if let Some(point) = record.get("location").and_then(connect_point) {
                locations.push(point);
            }
        }

        Self {
            id: text(record, "id").unwrap_or_default(),
            mac: text(record, "mac"),
            vlan: text(record, "vlan"),
            ip_addresses: strings(record, "ipAddresses"),
            locations,
        }
    }
}

impl From<&Value> for Flow {
    fn from(record: &Value) -> Self {
        Self {
            id: text(record, "id").unwrap_or_default(),
            device_id: text(record, "deviceId"),
            app_id: text(record, "appId"),
            table_id: signed(record, "tableId"),
            priority: signed(record, "priority").unwrap_or(0),
            timeout: signed(record, "timeout").unwrap_or(0),
            is_permanent: flag(record, "isPermanent").unwrap_or(false),
            state: text(record, "state"),
            bytes: flow_bytes(record),
            packets: unsigned(record, "packets").unwrap_or(0),
            life: unsigned(record, "life").unwrap_or(0),
        }
    }
}

impl From<&Value> for Link {
    fn from(record: &Value) -> Self {
        Self {
            src: record
                .get("src")
                .and_then(connect_point)
                .unwrap_or_else(missing_point),
            dst: record
                .get("dst")
                .and_then(connect_point)
                .unwrap_or_else(missing_point),
            link_type: text(record, "type"),
            state: text(record, "state"),
        }
    }
}

impl From<&Value> for TopologySummary {
    fn from(record: &Value) -> Self {
        Self {
            time: unsigned(record, "time"),
            devices: unsigned(record, "devices").unwrap_or(0),
            links: unsigned(record, "links").unwrap_or(0),
            clusters: unsigned(record, "clusters").unwrap_or(0),
        }
    }
}

impl From<&Value> for Cluster {
    fn from(record: &Value) -> Self {
        Self {
            id: signed(record, "id").unwrap_or(0),
            device_count: unsigned(record, "deviceCount").unwrap_or(0),
            link_count: unsigned(record, "linkCount").unwrap_or(0),
            root: text(record, "root"),
        }
    }
}

impl From<&Value> for Application {
    fn from(record: &Value) -> Self {
        Self {
            id: unsigned(record, "id"),
            name: text(record, "name").unwrap_or_default(),
            version: text(record, "version"),
            state: text(record, "state"),
            category: text(record, "category"),
            origin: text(record, "origin"),
        }
    }
}

/// Byte counter of one flow record: `bytes`, falling back to `byteCount`.
///
/// A zero or unusable `bytes` value defers to `byteCount`; neither present
/// counts as zero.
pub fn flow_bytes(record: &Value) -> u64 {
    unsigned(record, "bytes")
        .filter(|b| *b > 0)
        .or_else(|| unsigned(record, "byteCount"))
        .unwrap_or(0)
}

/// Convert every record of a collection into its view.
pub fn views<'a, T>(records: impl IntoIterator<Item = &'a Value>) -> Vec<T>
where
    T: From<&'a Value>,
{
    records.into_iter().map(T::from).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn device_from_controller_record() {
        let record = json!({
            "id": "of:0000000000000001",
            "type": "SWITCH",
            "available": true,
            "role": "MASTER",
            "mfr": "Nicira, Inc.",
            "hw": "Open vSwitch",
            "sw": "2.5.0",
            "serial": "None",
            "chassisId": "1",
            "annotations": { "driver": "ovs" }
        });

        let device = Device::from(&record);
        assert_eq!(device.id, "of:0000000000000001");
        assert_eq!(device.type_label(), "SWITCH");
        assert!(device.available);
        assert_eq!(device.manufacturer.as_deref(), Some("Nicira, Inc."));
        assert_eq!(device.driver.as_deref(), Some("ovs"));
    }

    #[test]
    fn device_from_sparse_record_uses_defaults() {
        let device = Device::from(&json!({ "id": "of:2" }));
        assert!(!device.available);
        assert_eq!(device.type_label(), "SWITCH");
        assert!(device.role.is_none());
    }

    #[test]
    fn host_locations_accept_both_shapes() {
        let modern = Host::from(&json!({
            "id": "00:00:00:00:00:01/None",
            "mac": "00:00:00:00:00:01",
            "vlan": "None",
            "ipAddresses": ["10.0.0.1"],
            "locations": [{ "elementId": "of:0000000000000001", "port": "1" }]
        }));
        assert_eq!(modern.locations.len(), 1);
        assert_eq!(modern.locations[0].to_string(), "of:0000000000000001/1");
        assert_eq!(modern.ip_addresses, vec!["10.0.0.1".to_owned()]);

        let legacy = Host::from(&json!({
            "id": "h2",
            "location": { "elementId": "of:2", "port": "3" }
        }));
        assert_eq!(legacy.locations[0].port, "3");
    }

    #[test]
    fn flow_counters_are_lenient() {
        let flow = Flow::from(&json!({
            "id": "54043195528453770",
            "deviceId": "of:1",
            "priority": 40000,
            "timeout": "0",
            "isPermanent": true,
            "bytes": "4096",
            "packets": 12.0
        }));
        assert_eq!(flow.bytes, 4096);
        assert_eq!(flow.packets, 12);
        assert_eq!(flow.priority, 40000);
        assert!(flow.is_permanent);
    }

    #[test]
    fn flow_bytes_falls_back_to_byte_count() {
        assert_eq!(flow_bytes(&json!({ "bytes": 1024 })), 1024);
        assert_eq!(flow_bytes(&json!({ "byteCount": 512 })), 512);
        assert_eq!(flow_bytes(&json!({ "bytes": 0, "byteCount": 7 })), 7);
        assert_eq!(flow_bytes(&json!({ "bytes": "n/a" })), 0);
        assert_eq!(flow_bytes(&json!({ "bytes": -5 })), 0);
        assert_eq!(flow_bytes(&json!({})), 0);
    }

    #[test]
    fn application_state() {
        let app = Application::from(&json!({
            "name": "org.onosproject.fwd",
            "id": 45,
            "version": "2.7.0",
            "state": "ACTIVE",
            "origin": "ONOS Community"
        }));
        assert_eq!(app.id, Some(45));
        assert!(app.is_active());
        assert!(!Application::from(&json!({ "name": "x", "state": "INSTALLED" })).is_active());
    }

    #[test]
    fn link_endpoints() {
        let link = Link::from(&json!({
            "src": { "port": "2", "device": "of:1" },
            "dst": { "port": "3", "device": "of:2" },
            "type": "DIRECT",
            "state": "ACTIVE"
        }));
        assert_eq!(link.src.to_string(), "of:1/2");
        assert_eq!(link.dst.device, "of:2");
        assert_eq!(link.link_type.as_deref(), Some("DIRECT"));
    }

    #[test]
    fn topology_summary() {
        let summary = TopologySummary::from(&json!({
            "time": 11_041_264_743_456_u64,
            "devices": 4,
            "links": 6,
            "clusters": 1
        }));
        assert_eq!(summary.devices, 4);
        assert_eq!(summary.clusters, 1);
    }
}
