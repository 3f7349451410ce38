//! Query options and result shapes.
//!
//! [`QueryLimits`] holds the defaults and bounds applied to caller input
//! before anything reaches the distance engine.

use serde::Serialize;

use crate::coords::GeoPoint;
use crate::error::{DirectoryError, Result};
use crate::facility::{Facility, RankedFacility};

/// Defaults and bounds for query parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryLimits {
    /// Nearest-K limit used when none (or an invalid one) is given.
    pub default_limit: usize,
    /// Largest nearest-K limit; bigger requests are clamped to this.
    pub max_limit: usize,
    /// Radius used when none (or a non-numeric one) is given.
    pub default_radius_km: f64,
    /// Largest accepted radius. Anything above is rejected, not clamped.
    pub max_radius_km: f64,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 20,
            default_radius_km: 50.0,
            max_radius_km: 500.0,
        }
    }
}

impl QueryLimits {
    /// Read limits from environment variables, keeping defaults for anything
    /// unset or unparsable.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CAREFIND_DEFAULT_LIMIT` | 5 |
    /// | `CAREFIND_MAX_LIMIT` | 20 |
    /// | `CAREFIND_DEFAULT_RADIUS_KM` | 50 |
    /// | `CAREFIND_MAX_RADIUS_KM` | 500 |
    pub fn from_env() -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            default_limit: var("CAREFIND_DEFAULT_LIMIT").unwrap_or(defaults.default_limit),
            max_limit: var("CAREFIND_MAX_LIMIT").unwrap_or(defaults.max_limit),
            default_radius_km: var("CAREFIND_DEFAULT_RADIUS_KM")
                .unwrap_or(defaults.default_radius_km),
            max_radius_km: var("CAREFIND_MAX_RADIUS_KM").unwrap_or(defaults.max_radius_km),
        }
    }

    /// Resolve a requested nearest-K limit.
    ///
    /// Missing or non-positive values fall back to `default_limit`; values
    /// above `max_limit` are clamped down.
    ///
    /// # Examples
    ///
    /// ```
    /// use carefind::QueryLimits;
    ///
    /// let limits = QueryLimits::default();
    /// assert_eq!(limits.resolve_limit(None), 5);
    /// assert_eq!(limits.resolve_limit(Some(0)), 5);
    /// assert_eq!(limits.resolve_limit(Some(3)), 3);
    /// assert_eq!(limits.resolve_limit(Some(100)), 20);
    /// ```
    pub fn resolve_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n >= 1 => (n as u64).min(self.max_limit as u64) as usize,
            _ => self.default_limit,
        }
    }

    /// Resolve a requested search radius in kilometers.
    ///
    /// Missing or NaN values fall back to `default_radius_km`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidRadius`] unless the radius is in
    /// `(0, max_radius_km]`.
    pub fn resolve_radius(&self, requested: Option<f64>) -> Result<f64> {
        let radius_km = requested
            .filter(|r| !r.is_nan())
            .unwrap_or(self.default_radius_km);

        if radius_km > 0.0 && radius_km <= self.max_radius_km {
            Ok(radius_km)
        } else {
            Err(DirectoryError::InvalidRadius {
                radius_km,
                max_km: self.max_radius_km,
            })
        }
    }
}

/// Result of a nearest-K query.
#[derive(Debug, Clone, Serialize)]
pub struct NearestResult {
    /// The validated query point.
    pub user_location: GeoPoint,
    /// Number of results returned.
    pub total_found: usize,
    /// Size of the whole directory at query time.
    pub total_available: usize,
    /// Ranked facilities, nearest first.
    pub results: Vec<RankedFacility>,
}

/// Result of a radius query.
#[derive(Debug, Clone, Serialize)]
pub struct RadiusResult {
    /// The validated query point.
    pub search_location: GeoPoint,
    /// The radius actually applied.
    pub radius_km: f64,
    /// Number of facilities inside the radius.
    pub count: usize,
    /// Ranked facilities, nearest first.
    pub results: Vec<RankedFacility>,
}

/// Result of a listing, optionally filtered by name.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub total: usize,
    pub results: Vec<Facility>,
}

/// Whether the directory currently holds any facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryStatus {
    Loaded,
    Empty,
}

impl DirectoryStatus {
    pub fn from_count(total: usize) -> Self {
        if total > 0 {
            Self::Loaded
        } else {
            Self::Empty
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Empty => "empty",
        }
    }
}

/// Size and status of the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryCount {
    pub total: usize,
    pub status: DirectoryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        let limits = QueryLimits::default();
        assert_eq!(limits.resolve_limit(None), 5);
        assert_eq!(limits.resolve_limit(Some(-3)), 5);
        assert_eq!(limits.resolve_limit(Some(0)), 5);
        assert_eq!(limits.resolve_limit(Some(1)), 1);
        assert_eq!(limits.resolve_limit(Some(20)), 20);
        assert_eq!(limits.resolve_limit(Some(21)), 20);
        assert_eq!(limits.resolve_limit(Some(i64::MAX)), 20);
    }

    #[test]
    fn test_resolve_radius_defaults() {
        let limits = QueryLimits::default();
        assert_eq!(limits.resolve_radius(None).unwrap(), 50.0);
        assert_eq!(limits.resolve_radius(Some(f64::NAN)).unwrap(), 50.0);
        assert_eq!(limits.resolve_radius(Some(0.001)).unwrap(), 0.001);
        assert_eq!(limits.resolve_radius(Some(500.0)).unwrap(), 500.0);
    }

    #[test]
    fn test_resolve_radius_rejects_out_of_range() {
        let limits = QueryLimits::default();
        for radius in [0.0, -1.0, 500.01, f64::INFINITY] {
            let err = limits.resolve_radius(Some(radius)).unwrap_err();
            assert!(matches!(err, DirectoryError::InvalidRadius { .. }));
        }
    }

    #[test]
    fn test_custom_limits() {
        let limits = QueryLimits {
            default_limit: 3,
            max_limit: 10,
            default_radius_km: 25.0,
            max_radius_km: 100.0,
        };
        assert_eq!(limits.resolve_limit(None), 3);
        assert_eq!(limits.resolve_limit(Some(50)), 10);
        assert_eq!(limits.resolve_radius(None).unwrap(), 25.0);
        assert!(limits.resolve_radius(Some(150.0)).is_err());
    }

    #[test]
    fn test_directory_status() {
        assert_eq!(DirectoryStatus::from_count(0), DirectoryStatus::Empty);
        assert_eq!(DirectoryStatus::from_count(3), DirectoryStatus::Loaded);
        let json = serde_json::to_string(&DirectoryCount {
            total: 3,
            status: DirectoryStatus::Loaded,
        })
        .unwrap();
        assert_eq!(json, r#"{"total":3,"status":"loaded"}"#);
    }
}
