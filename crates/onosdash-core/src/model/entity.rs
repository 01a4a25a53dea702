// ── Entity collections ──
//
// Raw controller records grouped by kind. The aggregator only counts
// them and hands them to presentation; field-level interpretation
// lives in the typed views next door.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter};
use tracing::debug;

/// Every resource fetched during a refresh cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Devices,
    Hosts,
    Flows,
    Links,
    Topology,
}

impl EntityKind {
    /// Name of the array field inside the response wrapper.
    ///
    /// `None` for topology, which is a flat summary object.
    pub fn container_field(self) -> Option<&'static str> {
        match self {
            Self::Devices => Some("devices"),
            Self::Hosts => Some("hosts"),
            Self::Flows => Some("flows"),
            Self::Links => Some("links"),
            Self::Topology => None,
        }
    }
}

/// An ordered sequence of raw records of one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityCollection {
    pub kind: EntityKind,
    pub records: Arc<Vec<Value>>,
}

impl EntityCollection {
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            kind,
            records: Arc::new(Vec::new()),
        }
    }

    /// Pull the named array out of a response wrapper.
    ///
    /// Anything other than an object carrying an array under the expected
    /// field yields an empty collection.
    pub fn extract(kind: EntityKind, wrapper: &Value) -> Self {
        let Some(field) = kind.container_field() else {
            return Self::empty(kind);
        };

        match wrapper.get(field) {
            Some(Value::Array(items)) => Self {
                kind,
                records: Arc::new(items.clone()),
            },
            Some(other) => {
                debug!(%kind, found = type_name(other), "container field is not an array");
                Self::empty(kind)
            }
            None => {
                debug!(%kind, field, "container field missing from response");
                Self::empty(kind)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.records.iter()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
