//! Coordinate validation and geographic primitives.
//!
//! Every coordinate that reaches the distance engine passes through
//! [`is_valid_coordinate`], whether it came from the directory file or from a
//! caller's query.

use serde::Serialize;

use crate::error::{DirectoryError, Result};

/// Validate that a latitude/longitude pair is a usable geodetic coordinate.
///
/// Both values must be finite numbers with latitude in `[-90, 90]` and
/// longitude in `[-180, 180]`. The bounds are inclusive. NaN is rejected.
///
/// # Examples
///
/// ```
/// use carefind::coords::is_valid_coordinate;
///
/// assert!(is_valid_coordinate(-90.0, 180.0));
/// assert!(!is_valid_coordinate(91.0, 0.0));
/// assert!(!is_valid_coordinate(f64::NAN, 0.0));
/// ```
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// A validated point on the Earth's surface, in decimal degrees.
///
/// The fields are private so that a `GeoPoint` can only exist with
/// coordinates inside the geodetic range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting out-of-range or NaN coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidCoordinates`] when the pair fails
    /// [`is_valid_coordinate`].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !is_valid_coordinate(latitude, longitude) {
            return Err(DirectoryError::InvalidCoordinates {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// An axis-aligned latitude/longitude rectangle.
///
/// Used as a cheap pre-filter; membership says nothing about exact
/// great-circle distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Minimum latitude (southern boundary).
    pub min_lat: f64,
    /// Maximum latitude (northern boundary).
    pub max_lat: f64,
    /// Minimum longitude (western boundary).
    pub min_lon: f64,
    /// Maximum longitude (eastern boundary).
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Check whether a coordinate lies inside the box (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}
