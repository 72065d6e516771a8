//! # Dataset Records
//!
//! Typed wrappers for the datasets whose schema is known at the page
//! boundary. The pipeline itself stays schemaless; these types exist so
//! collaborating pages construct well-formed records instead of reaching
//! into loose maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;

/// A street-tree observation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TreeObservation {
    /// Observation identifier.
    pub id: String,

    /// Common species name.
    pub species: String,

    /// Diameter at breast height, in inches.
    pub dbh: f64,

    /// Condition rating, when assessed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Longitude of the observation.
    pub longitude: f64,

    /// Latitude of the observation.
    pub latitude: f64,
}

impl From<TreeObservation> for Record {
    fn from(tree: TreeObservation) -> Self {
        let mut record = Self::new();
        record.insert("id", tree.id);
        record.insert("species", tree.species);
        record.insert("dbh", tree.dbh);
        if let Some(condition) = tree.condition {
            record.insert("condition", condition);
        }
        record.insert("longitude", tree.longitude);
        record.insert("latitude", tree.latitude);
        record
    }
}

/// One air-quality reading from a monitoring station.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AirQualityReading {
    /// Monitoring station name.
    pub station: String,

    /// Pollutant measured, e.g. `PM2.5`.
    pub pollutant: String,

    /// Measured concentration.
    pub value: f64,

    /// Unit of measure.
    pub unit: String,

    /// When the reading was taken.
    pub timestamp: DateTime<Utc>,
}

impl From<AirQualityReading> for Record {
    fn from(reading: AirQualityReading) -> Self {
        let mut record = Self::new();
        record.insert("station", reading.station);
        record.insert("pollutant", reading.pollutant);
        record.insert("value", reading.value);
        record.insert("unit", reading.unit);
        record.insert("timestamp", Value::String(reading.timestamp.to_rfc3339()));
        record
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tree_converts_to_record() {
        let tree = TreeObservation {
            id: "t-001".to_string(),
            species: "Coast Live Oak".to_string(),
            dbh: 20.0,
            condition: None,
            longitude: -122.27,
            latitude: 37.87,
        };

        let record = Record::from(tree);
        assert_eq!(record.get("species"), Some(&json!("Coast Live Oak")));
        assert_eq!(record.get("condition"), None);
    }
}
