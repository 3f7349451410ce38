//! GeoJSON export of facilities.
//!
//! Enable the `geojson` feature to use this module. Every facility becomes a
//! `Point` feature with coordinates in GeoJSON order `[longitude, latitude]`
//! and its name and address as properties.
//!
//! # Example
//!
//! ```ignore
//! use carefind::FacilityDirectory;
//! use carefind::geojson::facilities_to_feature_collection;
//!
//! let directory = FacilityDirectory::load("hospital_directory.csv")?;
//! let snapshot = directory.snapshot();
//! let collection = facilities_to_feature_collection(snapshot.facilities());
//! println!("{}", serde_json::to_string(&collection)?);
//! ```

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};

use crate::facility::{Facility, RankedFacility};

fn facility_properties(facility: &Facility) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), JsonValue::from(facility.name.as_str()));
    properties.insert(
        "address".to_string(),
        JsonValue::from(facility.address.as_str()),
    );
    properties
}

fn point_feature(facility: &Facility, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Point(vec![
            facility.longitude,
            facility.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert a single facility into a `Point` feature.
pub fn facility_to_feature(facility: &Facility) -> Feature {
    point_feature(facility, facility_properties(facility))
}

/// Convert facilities into a `FeatureCollection`, preserving their order.
pub fn facilities_to_feature_collection(facilities: &[Facility]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: facilities.iter().map(facility_to_feature).collect(),
        foreign_members: None,
    }
}

/// Convert ranked results into a `FeatureCollection`.
///
/// Each feature also carries `distance_km` and `distance_formatted`.
pub fn ranked_to_feature_collection(ranked: &[RankedFacility]) -> FeatureCollection {
    let features = ranked
        .iter()
        .map(|r| {
            let mut properties = facility_properties(&r.facility);
            properties.insert("distance_km".to_string(), JsonValue::from(r.distance_km));
            properties.insert(
                "distance_formatted".to_string(),
                JsonValue::from(r.distance_formatted.as_str()),
            );
            point_feature(&r.facility, properties)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Facility> {
        vec![
            Facility::new("AIIMS", "Ansari Nagar, New Delhi", 28.5672, 77.2100),
            Facility::new("KEM Hospital", "Parel, Mumbai", 19.0030, 72.8420),
        ]
    }

    #[test]
    fn test_facility_to_feature_uses_lon_lat_order() {
        let feature = facility_to_feature(&sample()[0]);
        let geometry = feature.geometry.unwrap();
        if let GeoJsonValue::Point(coord) = geometry.value {
            assert_eq!(coord, vec![77.2100, 28.5672]);
        } else {
            panic!("Expected Point geometry");
        }

        let properties = feature.properties.unwrap();
        assert_eq!(properties["name"], "AIIMS");
        assert_eq!(properties["address"], "Ansari Nagar, New Delhi");
    }

    #[test]
    fn test_feature_collection_preserves_order() {
        let collection = facilities_to_feature_collection(&sample());
        assert_eq!(collection.features.len(), 2);
        let second = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(second["name"], "KEM Hospital");
    }

    #[test]
    fn test_empty_feature_collection() {
        let collection = facilities_to_feature_collection(&[]);
        assert!(collection.features.is_empty());
        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.contains("FeatureCollection"));
    }

    #[test]
    fn test_ranked_feature_collection() {
        let ranked = vec![RankedFacility::new(sample().remove(0), 3.47)];
        let collection = ranked_to_feature_collection(&ranked);
        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["distance_km"], 3.47);
        assert_eq!(properties["distance_formatted"], "3.5 km");
    }
}
