//! Facility directory loading from delimited files.
//!
//! The source is a CSV file with a header row. Each logical field is looked up
//! through an ordered list of column aliases; the first alias whose column
//! exists and holds a non-empty value wins.
//!
//! # Coordinates
//!
//! 1. The combined [`LOCATION_COLUMN`] (`"<lat>, <lon>"`) is tried first. It is
//!    used only when it splits into exactly two parts that both parse.
//! 2. Otherwise latitude comes from [`LATITUDE_ALIASES`] and longitude from
//!    [`LONGITUDE_ALIASES`].
//!
//! Values are parsed strictly as whole floats: `"28.6139 N"` or `"12.97°"` is
//! unparsable, not read as its numeric prefix.
//!
//! Rows whose coordinates are missing, unparsable or out of range are dropped
//! and counted in [`LoadStats`]. Rows the CSV reader cannot decode are skipped
//! with a warning. Only file-level failures (missing file, unreadable header,
//! broken stream) are errors.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;

use crate::coords::is_valid_coordinate;
use crate::error::{DirectoryError, Result};
use crate::facility::{Facility, DEFAULT_ADDRESS, DEFAULT_NAME};

/// Combined coordinate column, formatted as `"<lat>, <lon>"`.
pub const LOCATION_COLUMN: &str = "Location_Coordinates";

/// Latitude column aliases, in priority order.
pub const LATITUDE_ALIASES: &[&str] = &["latitude", "Latitude", "lat", "Lat"];

/// Longitude column aliases, in priority order.
pub const LONGITUDE_ALIASES: &[&str] = &["longitude", "Longitude", "lon", "Lon", "lng", "Lng"];

/// Facility name column aliases, in priority order.
pub const NAME_ALIASES: &[&str] = &[
    "Hospital_Name",
    "name",
    "Name",
    "hospital_name",
    "Hospital Name",
];

/// Address column aliases, in priority order.
pub const ADDRESS_ALIASES: &[&str] = &[
    "Address_Original_First_Line",
    "address",
    "Address",
    "location",
    "Location",
];

/// Counters collected while loading a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows seen, excluding the header.
    pub rows_read: usize,
    /// Rows the CSV reader could not decode.
    pub malformed_rows: usize,
    /// Rows dropped for missing or invalid coordinates.
    pub invalid_coordinates: usize,
}

impl LoadStats {
    /// Total rows that did not make it into the directory.
    pub fn skipped(&self) -> usize {
        self.malformed_rows + self.invalid_coordinates
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadedDirectory {
    /// Facilities with valid coordinates, in source order.
    pub facilities: Vec<Facility>,
    /// Load counters.
    pub stats: LoadStats,
}

/// Header positions for each alias list, in alias priority order.
struct ColumnMap {
    location: Option<usize>,
    latitude: Vec<usize>,
    longitude: Vec<usize>,
    name: Vec<usize>,
    address: Vec<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |alias: &str| headers.iter().position(|h| h == alias);
        let resolve =
            |aliases: &[&str]| -> Vec<usize> { aliases.iter().filter_map(|a| position(*a)).collect() };

        Self {
            location: position(LOCATION_COLUMN),
            latitude: resolve(LATITUDE_ALIASES),
            longitude: resolve(LONGITUDE_ALIASES),
            name: resolve(NAME_ALIASES),
            address: resolve(ADDRESS_ALIASES),
        }
    }

    fn has_coordinates(&self) -> bool {
        self.location.is_some() || (!self.latitude.is_empty() && !self.longitude.is_empty())
    }
}

/// First non-blank value among `columns`, trimmed.
fn first_non_empty<'r>(record: &'r StringRecord, columns: &[usize]) -> Option<&'r str> {
    columns
        .iter()
        .filter_map(|&i| record.get(i))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a combined `"<lat>, <lon>"` value.
///
/// # Examples
///
/// ```
/// use carefind::loader::parse_location_pair;
///
/// assert_eq!(parse_location_pair("12.9716, 77.5946"), Some((12.9716, 77.5946)));
/// assert_eq!(parse_location_pair("12.9, "), None);
/// assert_eq!(parse_location_pair("1, 2, 3"), None);
/// ```
pub fn parse_location_pair(value: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [lat, lon] => Some((parse_number(lat)?, parse_number(lon)?)),
        _ => None,
    }
}

fn extract_coordinates(record: &StringRecord, columns: &ColumnMap) -> Option<(f64, f64)> {
    let combined = columns
        .location
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(parse_location_pair);

    if combined.is_some() {
        return combined;
    }

    let lat = parse_number(first_non_empty(record, &columns.latitude)?)?;
    let lon = parse_number(first_non_empty(record, &columns.longitude)?)?;
    Some((lat, lon))
}

/// Build a facility from one row, or `None` if its coordinates are unusable.
fn facility_from_record(record: &StringRecord, columns: &ColumnMap) -> Option<Facility> {
    let (latitude, longitude) = extract_coordinates(record, columns)?;
    if !is_valid_coordinate(latitude, longitude) {
        return None;
    }

    let name = first_non_empty(record, &columns.name).unwrap_or(DEFAULT_NAME);
    let address = first_non_empty(record, &columns.address).unwrap_or(DEFAULT_ADDRESS);

    Some(Facility::new(name, address, latitude, longitude))
}

/// Load facilities from a CSV file.
///
/// # Errors
///
/// - [`DirectoryError::FileNotFound`] if `path` does not exist
/// - [`DirectoryError::Io`] if it cannot be opened
/// - [`DirectoryError::Csv`] if the header or the underlying stream fails
///
/// # Example
///
/// ```ignore
/// use carefind::loader::load_from_path;
///
/// let loaded = load_from_path("hospital_directory.csv")?;
/// println!("{} facilities", loaded.facilities.len());
/// ```
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<LoadedDirectory> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DirectoryError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), "Reading facility directory");

    let file = File::open(path)?;
    load_from_reader(BufReader::new(file))
}

/// Load facilities from any CSV byte stream with a header row.
///
/// # Example
///
/// ```
/// use carefind::loader::load_from_reader;
///
/// let csv = "Hospital_Name,Location_Coordinates\nCity Hospital,\"12.9716, 77.5946\"\n";
/// let loaded = load_from_reader(csv.as_bytes()).unwrap();
/// assert_eq!(loaded.facilities.len(), 1);
/// assert_eq!(loaded.facilities[0].latitude, 12.9716);
/// ```
pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadedDirectory> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);
    if !columns.has_coordinates() {
        tracing::warn!(
            headers = ?headers.iter().collect::<Vec<_>>(),
            "No coordinate columns recognized; every row will be dropped"
        );
    }

    let mut loaded = LoadedDirectory::default();

    for (index, result) in reader.records().enumerate() {
        loaded.stats.rows_read += 1;
        // Header is line 1.
        let line = index + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                loaded.stats.malformed_rows += 1;
                tracing::warn!(line, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        match facility_from_record(&record, &columns) {
            Some(facility) => loaded.facilities.push(facility),
            None => {
                loaded.stats.invalid_coordinates += 1;
                tracing::debug!(line, "Dropping row without valid coordinates");
            }
        }
    }

    tracing::info!(
        loaded = loaded.facilities.len(),
        rows_read = loaded.stats.rows_read,
        skipped = loaded.stats.skipped(),
        "Facilities with valid coordinates"
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn load(csv: &str) -> LoadedDirectory {
        load_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_combined_coordinates() {
        let loaded = load(
            "Hospital_Name,Address_Original_First_Line,Location_Coordinates\n\
             City Hospital,1 MG Road,\"12.9716, 77.5946\"\n",
        );
        assert_eq!(loaded.facilities.len(), 1);
        let f = &loaded.facilities[0];
        assert_eq!(f.name, "City Hospital");
        assert_eq!(f.address, "1 MG Road");
        assert_eq!(f.latitude, 12.9716);
        assert_eq!(f.longitude, 77.5946);
    }

    #[test]
    fn test_malformed_combined_coordinates_dropped() {
        let loaded = load(
            "Hospital_Name,Location_Coordinates\n\
             Broken,\"12.9, \"\n\
             Good,\"12.9716, 77.5946\"\n",
        );
        assert_eq!(loaded.facilities.len(), 1);
        assert_eq!(loaded.facilities[0].name, "Good");
        assert_eq!(loaded.stats.rows_read, 2);
        assert_eq!(loaded.stats.invalid_coordinates, 1);
    }

    #[test]
    fn test_individual_columns() {
        let loaded = load("name,address,lat,lng\nClinic,Main St,19.07,72.87\n");
        assert_eq!(loaded.facilities.len(), 1);
        assert_eq!(loaded.facilities[0].name, "Clinic");
        assert_eq!(loaded.facilities[0].latitude, 19.07);
        assert_eq!(loaded.facilities[0].longitude, 72.87);
    }

    #[test]
    fn test_combined_falls_back_to_individual_columns() {
        let loaded = load(
            "Hospital_Name,Location_Coordinates,Latitude,Longitude\n\
             Fallback,,28.61,77.20\n\
             Bad Pair,\"abc, def\",28.62,77.21\n",
        );
        assert_eq!(loaded.facilities.len(), 2);
        assert_eq!(loaded.facilities[0].latitude, 28.61);
        assert_eq!(loaded.facilities[1].longitude, 77.21);
    }

    #[test]
    fn test_combined_takes_priority() {
        let loaded = load("Location_Coordinates,lat,lon\n\"1.5, 2.5\",10.0,20.0\n");
        assert_eq!(loaded.facilities[0].latitude, 1.5);
        assert_eq!(loaded.facilities[0].longitude, 2.5);
    }

    #[test]
    fn test_alias_priority_skips_empty_values() {
        let loaded = load("latitude,Lat,longitude,Lon\n,11.0,22.0,\n");
        assert_eq!(loaded.facilities.len(), 1);
        assert_eq!(loaded.facilities[0].latitude, 11.0);
        assert_eq!(loaded.facilities[0].longitude, 22.0);
    }

    #[test]
    fn test_out_of_range_dropped() {
        let loaded = load("name,lat,lon\nNorth,91.0,0.0\nEast,0.0,181.0\nOk,-90.0,180.0\n");
        assert_eq!(loaded.facilities.len(), 1);
        assert_eq!(loaded.facilities[0].name, "Ok");
        assert_eq!(loaded.stats.invalid_coordinates, 2);
    }

    #[test]
    fn test_trailing_text_in_coordinates_dropped() {
        let loaded = load(
            "name,lat,lon,Location_Coordinates\n\
             Suffix,28.6139 N,77.2090,\n\
             Degrees,12.97\u{b0},77.59,\n\
             Combined,,,\"19.07 N, 72.87\"\n\
             Plain,1.5,2.5,\n",
        );
        assert_eq!(loaded.facilities.len(), 1);
        assert_eq!(loaded.facilities[0].name, "Plain");
        assert_eq!(loaded.stats.invalid_coordinates, 3);
    }

    #[test]
    fn test_nan_and_missing_dropped() {
        let loaded = load("name,lat,lon\nA,NaN,1.0\nB,,1.0\nC,1.0\n");
        assert!(loaded.facilities.is_empty());
        assert_eq!(loaded.stats.rows_read, 3);
    }

    #[test]
    fn test_defaults_for_missing_name_and_address() {
        let loaded = load("lat,lon\n1.0,2.0\n");
        assert_eq!(loaded.facilities[0].name, DEFAULT_NAME);
        assert_eq!(loaded.facilities[0].address, DEFAULT_ADDRESS);
    }

    #[test]
    fn test_hospital_name_with_space_alias() {
        let loaded = load("Hospital Name,Location,lat,lon\nSt. Mary,Hill Rd,1.0,2.0\n");
        assert_eq!(loaded.facilities[0].name, "St. Mary");
        assert_eq!(loaded.facilities[0].address, "Hill Rd");
    }

    #[test]
    fn test_invalid_utf8_row_skipped() {
        let mut data = b"name,lat,lon\nGood,1.0,2.0\n".to_vec();
        data.extend_from_slice(b"Bad\xff\xfe,3.0,4.0\n");
        data.extend_from_slice(b"Also Good,5.0,6.0\n");

        let loaded = load_from_reader(data.as_slice()).unwrap();
        assert_eq!(loaded.facilities.len(), 2);
        assert_eq!(loaded.stats.malformed_rows, 1);
        assert_eq!(loaded.stats.skipped(), 1);
    }

    #[test]
    fn test_no_coordinate_columns() {
        let loaded = load("name,address\nA,B\n");
        assert!(loaded.facilities.is_empty());
        assert_eq!(loaded.stats.invalid_coordinates, 1);
    }

    #[test]
    fn test_preserves_source_order() {
        let loaded = load("name,lat,lon\nC,3,3\nA,1,1\nB,2,2\n");
        let names: Vec<_> = loaded.facilities.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hospitals.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Hospital_Name,Location_Coordinates").unwrap();
        writeln!(file, "Delhi Central,\"28.6139, 77.2090\"").unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.facilities.len(), 1);
    }

    #[test]
    fn test_load_from_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, DirectoryError::FileNotFound { .. }));
    }

    #[test]
    fn test_parse_location_pair() {
        assert_eq!(parse_location_pair(" 1.5 ,  -2.5 "), Some((1.5, -2.5)));
        assert_eq!(parse_location_pair("1.5"), None);
        assert_eq!(parse_location_pair(", 2.5"), None);
        assert_eq!(parse_location_pair("NaN, 2.5"), None);
    }
}
