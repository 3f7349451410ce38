//! # carefind - Hospital Directory Search
//!
//! In-memory directory of healthcare facilities loaded from a CSV export,
//! with great-circle (Haversine) nearest-K and radius queries.
//!
//! ## Features
//!
//! - **Lenient loading**: Header aliases, combined `"lat, lon"` columns and
//!   malformed rows are handled without aborting the load
//! - **Deterministic ranking**: Results are sorted by rounded distance, ties
//!   keep directory order
//! - **Live reload**: The directory can be re-read from disk while queries
//!   keep running against the previous snapshot
//! - **GeoJSON export**: Enable the `geojson` feature to export facilities
//!   as a `FeatureCollection`
//!
//! ## Quick Start
//!
//! ```ignore
//! use carefind::FacilityDirectory;
//!
//! let directory = FacilityDirectory::load("hospital_directory.csv")?;
//!
//! let nearest = directory.nearest(28.6139, 77.2090, Some(3))?;
//! for hospital in &nearest.results {
//!     println!("{} ({})", hospital.facility.name, hospital.distance_formatted);
//! }
//! ```
//!
//! ## Directory Format
//!
//! The first row is a header. Coordinates come from a combined
//! `Location_Coordinates` column (`"lat, lon"`) when present, otherwise from
//! separate latitude/longitude columns such as `Latitude`/`Longitude` or
//! `lat`/`lon`. Rows without valid coordinates are skipped.

pub mod coords;
pub mod directory;
pub mod distance;
pub mod error;
pub mod facility;
pub mod loader;
pub mod query;
pub mod triage;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use coords::{is_valid_coordinate, BoundingBox, GeoPoint};
pub use directory::{DirectorySnapshot, FacilityDirectory, FacilityDirectoryBuilder};
pub use distance::{haversine_distance, EARTH_RADIUS_KM};
pub use error::{DirectoryError, Result};
pub use facility::{Facility, RankedFacility};
pub use loader::LoadStats;
pub use query::{
    DirectoryCount, DirectoryStatus, ListResult, NearestResult, QueryLimits, RadiusResult,
};
