//! Reading and schema-variant types.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::redfish::odata_id;

/// Top-level keys that carry Redfish metadata rather than telemetry
pub const EXCLUDED_KEYS: [&str; 8] = [
    "Description",
    "@odata.context",
    "@odata.id",
    "@odata.type",
    "@odata.etag",
    "Links",
    "Actions",
    "RelatedItem",
];

/// One sensor's telemetry with metadata keys removed.
/// Serializes as a plain JSON object with sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Reading(Map<String, Value>);

impl Reading {
    /// Build a reading from a fetched sensor object, dropping `EXCLUDED_KEYS`.
    /// Non-object input yields an empty reading.
    pub fn from_resource(resource: &Value) -> Self {
        let fields = resource
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(key, _)| !EXCLUDED_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Reading(fields)
    }
}

#[cfg(test)]
impl Reading {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a chassis publishes its temperatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThermalSource {
    /// ThermalSubsystem -> ThermalMetrics -> per-sensor DataSourceUri
    Subsystem(String),
    /// Legacy Thermal resource with inline Temperatures
    Legacy(String),
}

impl ThermalSource {
    /// Pick the schema variant a chassis exposes. ThermalSubsystem wins when both exist.
    pub fn detect(chassis: &Value) -> Option<Self> {
        if let Some(link) = odata_id(chassis, &["ThermalSubsystem"]) {
            Some(ThermalSource::Subsystem(link.to_string()))
        } else {
            odata_id(chassis, &["Thermal"]).map(|link| ThermalSource::Legacy(link.to_string()))
        }
    }
}
