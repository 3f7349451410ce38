//! Error types for the carefind library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or querying the facility directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// IO error when opening or streaming the source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The directory file does not exist.
    #[error("Directory file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The header row could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A query point is not a valid geodetic coordinate.
    #[error(
        "Invalid coordinates: lat={lat}, lon={lon} (latitude must be between -90 and 90, longitude between -180 and 180)"
    )]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// The search radius is outside the accepted range.
    #[error("Invalid radius: {radius_km} km (must be greater than 0 and at most {max_km} km)")]
    InvalidRadius { radius_km: f64, max_km: f64 },

    /// A required environment variable is not set.
    #[error("{name} environment variable not set")]
    MissingConfig { name: &'static str },
}

/// Result type alias using [`DirectoryError`].
pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DirectoryError::InvalidCoordinates {
            lat: 91.0,
            lon: 0.0,
        };
        assert!(err.to_string().contains("91"));
        assert!(err.to_string().contains("-90 and 90"));

        let err = DirectoryError::InvalidRadius {
            radius_km: 600.0,
            max_km: 500.0,
        };
        assert!(err.to_string().contains("600"));
        assert!(err.to_string().contains("500"));

        let err = DirectoryError::FileNotFound {
            path: PathBuf::from("hospital_directory.csv"),
        };
        assert!(err.to_string().contains("hospital_directory.csv"));

        let err = DirectoryError::MissingConfig {
            name: "CAREFIND_DIRECTORY",
        };
        assert!(err.to_string().contains("CAREFIND_DIRECTORY"));
    }
}
