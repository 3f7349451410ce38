//! In-memory facility directory with nearest and radius queries.
//!
//! [`FacilityDirectory`] owns the loaded facilities and answers every query
//! against an immutable snapshot. [`FacilityDirectory::reload`] builds a new
//! snapshot from the source file and swaps it in only after the load
//! succeeds, so readers see either the old or the new collection, never a
//! partial one. A failed reload leaves the old snapshot in place.
//!
//! ```ignore
//! use carefind::FacilityDirectory;
//!
//! let directory = FacilityDirectory::builder("hospital_directory.csv").build()?;
//!
//! let nearest = directory.nearest(28.6139, 77.2090, Some(3))?;
//! for hospital in &nearest.results {
//!     println!("{} ({})", hospital.facility.name, hospital.distance_formatted);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::coords::{BoundingBox, GeoPoint};
use crate::distance;
use crate::error::{DirectoryError, Result};
use crate::facility::Facility;
use crate::loader::{load_from_path, LoadStats, LoadedDirectory};
use crate::query::{
    DirectoryCount, DirectoryStatus, ListResult, NearestResult, QueryLimits, RadiusResult,
};

/// One loaded generation of the directory.
#[derive(Debug, Default)]
pub struct DirectorySnapshot {
    facilities: Vec<Facility>,
    stats: LoadStats,
}

impl DirectorySnapshot {
    /// Facilities in source order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// Counters from the load that produced this snapshot.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

impl From<LoadedDirectory> for DirectorySnapshot {
    fn from(loaded: LoadedDirectory) -> Self {
        Self {
            facilities: loaded.facilities,
            stats: loaded.stats,
        }
    }
}

/// Facility directory backed by a CSV file.
///
/// Cheap to share behind an `Arc`; all queries take `&self`.
pub struct FacilityDirectory {
    /// Path of the CSV source.
    source: PathBuf,
    /// Defaults and bounds applied to query input.
    limits: QueryLimits,
    /// Current snapshot. Replaced wholesale on reload.
    snapshot: RwLock<Arc<DirectorySnapshot>>,
}

impl FacilityDirectory {
    /// Load a directory from `path` with default query limits.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or unreadable. A service should not start
    /// serving when this fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        FacilityDirectoryBuilder::new(path).build()
    }

    /// Create a builder for more configuration options.
    pub fn builder<P: AsRef<Path>>(path: P) -> FacilityDirectoryBuilder {
        FacilityDirectoryBuilder::new(path)
    }

    /// Current snapshot. Holding it keeps that generation alive across a
    /// concurrent reload.
    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_snapshot(&self, snapshot: DirectorySnapshot) {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }

    /// Find the nearest facilities to a point.
    ///
    /// The coordinates are validated before any distance is computed.
    /// `limit` is resolved through [`QueryLimits::resolve_limit`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidCoordinates`] for an invalid point.
    /// An empty directory is not an error; it yields no results.
    pub fn nearest(&self, lat: f64, lon: f64, limit: Option<i64>) -> Result<NearestResult> {
        let point = GeoPoint::new(lat, lon)?;
        let limit = self.limits.resolve_limit(limit);

        let snapshot = self.snapshot();
        let results = distance::find_nearest(&point, snapshot.facilities(), limit);

        Ok(NearestResult {
            user_location: point,
            total_found: results.len(),
            total_available: snapshot.len(),
            results,
        })
    }

    /// Find every facility within a radius of a point.
    ///
    /// `radius_km` is resolved through [`QueryLimits::resolve_radius`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidCoordinates`] or
    /// [`DirectoryError::InvalidRadius`], checked in that order.
    pub fn within_radius(&self, lat: f64, lon: f64, radius_km: Option<f64>) -> Result<RadiusResult> {
        let point = GeoPoint::new(lat, lon)?;
        let radius_km = self.limits.resolve_radius(radius_km)?;

        let snapshot = self.snapshot();
        let results = distance::within_radius(&point, snapshot.facilities(), radius_km);

        Ok(RadiusResult {
            search_location: point,
            radius_km,
            count: results.len(),
            results,
        })
    }

    /// List the directory, optionally filtered by a name search term.
    ///
    /// A missing or blank term lists everything.
    pub fn list_all(&self, search: Option<&str>) -> ListResult {
        let results = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => self.search_by_name(term),
            None => self.snapshot().facilities().to_vec(),
        };

        ListResult {
            total: results.len(),
            results,
        }
    }

    /// Facilities whose name contains `term`, ignoring case.
    ///
    /// An empty term matches every facility.
    pub fn search_by_name(&self, term: &str) -> Vec<Facility> {
        let term = term.to_lowercase();
        self.snapshot()
            .facilities()
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }

    /// Facilities inside a lat/lon rectangle.
    pub fn in_bounds(&self, bounds: &BoundingBox) -> Vec<Facility> {
        self.snapshot()
            .facilities()
            .iter()
            .filter(|f| bounds.contains(f.latitude, f.longitude))
            .cloned()
            .collect()
    }

    /// Number of loaded facilities and whether the directory is empty.
    pub fn count(&self) -> DirectoryCount {
        let total = self.len();
        DirectoryCount {
            total,
            status: DirectoryStatus::from_count(total),
        }
    }

    /// Re-read the source file and replace the directory.
    ///
    /// Returns the new facility count.
    ///
    /// # Errors
    ///
    /// Propagates load failures. The previous snapshot keeps serving.
    pub fn reload(&self) -> Result<usize> {
        tracing::info!(source = %self.source.display(), "Reloading facility directory");

        match load_from_path(&self.source) {
            Ok(loaded) => {
                let total = loaded.facilities.len();
                self.replace_snapshot(loaded.into());
                tracing::info!(total, "Facility directory reloaded");
                Ok(total)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept = self.len(),
                    "Reload failed, keeping previous directory"
                );
                Err(e)
            }
        }
    }

    /// Number of loaded facilities.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counters from the most recent successful load.
    pub fn load_stats(&self) -> LoadStats {
        self.snapshot().stats()
    }

    /// Path of the CSV source.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Query defaults and bounds in effect.
    pub fn limits(&self) -> QueryLimits {
        self.limits
    }
}

/// Builder for creating a [`FacilityDirectory`] with custom configuration.
///
/// # Example
///
/// ```ignore
/// use carefind::{FacilityDirectoryBuilder, QueryLimits};
///
/// let directory = FacilityDirectoryBuilder::new("hospital_directory.csv")
///     .limits(QueryLimits { max_limit: 50, ..QueryLimits::default() })
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct FacilityDirectoryBuilder {
    source: PathBuf,
    limits: QueryLimits,
}

impl FacilityDirectoryBuilder {
    /// Create a new builder reading from `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: path.as_ref().to_path_buf(),
            limits: QueryLimits::default(),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CAREFIND_DIRECTORY` | Path to the facility CSV | Required |
    /// | `CAREFIND_DEFAULT_LIMIT` | Default nearest-K limit | 5 |
    /// | `CAREFIND_MAX_LIMIT` | Largest nearest-K limit | 20 |
    /// | `CAREFIND_DEFAULT_RADIUS_KM` | Default search radius | 50 |
    /// | `CAREFIND_MAX_RADIUS_KM` | Largest search radius | 500 |
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::MissingConfig`] if `CAREFIND_DIRECTORY` is
    /// not set.
    pub fn from_env() -> Result<Self> {
        let source = std::env::var("CAREFIND_DIRECTORY").map_err(|_| {
            DirectoryError::MissingConfig {
                name: "CAREFIND_DIRECTORY",
            }
        })?;

        Ok(Self {
            source: PathBuf::from(source),
            limits: QueryLimits::from_env(),
        })
    }

    /// Set the source path.
    pub fn source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = path.as_ref().to_path_buf();
        self
    }

    /// Set the query defaults and bounds.
    pub fn limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Perform the initial load and build the [`FacilityDirectory`].
    ///
    /// # Errors
    ///
    /// Fails if the source file is missing or unreadable.
    pub fn build(self) -> Result<FacilityDirectory> {
        let loaded = load_from_path(&self.source)?;

        Ok(FacilityDirectory {
            source: self.source,
            limits: self.limits,
            snapshot: RwLock::new(Arc::new(loaded.into())),
        })
    }
}
