//! Facility records held by the directory.

use serde::Serialize;

use crate::distance::format_distance;

/// Name used when a row has no usable name column.
pub const DEFAULT_NAME: &str = "Unknown Hospital";

/// Address used when a row has no usable address column.
pub const DEFAULT_ADDRESS: &str = "Address not available";

/// A single healthcare facility with validated coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    /// Human-readable facility name.
    pub name: String,
    /// Display address line.
    pub address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Facility {
    /// Create a facility record.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }
}

/// A facility annotated with its distance from a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub facility: Facility,
    /// Great-circle distance in kilometers, rounded to 2 decimals.
    pub distance_km: f64,
    /// Display form of `distance_km`, e.g. `"850 meters"` or `"4.2 km"`.
    pub distance_formatted: String,
}

impl RankedFacility {
    /// Annotate a facility with an already-rounded distance.
    pub fn new(facility: Facility, distance_km: f64) -> Self {
        Self {
            facility,
            distance_km,
            distance_formatted: format_distance(distance_km),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_serializes_flat() {
        let ranked = RankedFacility::new(
            Facility::new("City Hospital", "1 Main Rd", 12.97, 77.59),
            4.24,
        );
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["name"], "City Hospital");
        assert_eq!(json["latitude"], 12.97);
        assert_eq!(json["distance_km"], 4.24);
        assert_eq!(json["distance_formatted"], "4.2 km");
        assert!(json.get("facility").is_none());
    }
}
