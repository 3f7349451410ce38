use anyhow::{Context, Result};
use carefind::FacilityDirectory;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::open_directory;

/// Columns appended to every output row.
const OUTPUT_COLUMNS: [&str; 3] = ["nearest_hospital", "nearest_address", "distance_km"];

pub fn run(
    directory: Option<PathBuf>,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
) -> Result<()> {
    let directory = open_directory(directory)?;

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let (processed, unmatched) =
        process_csv(&directory, &input, &output_path, &lat_col, &lon_col)?;

    println!("Output written to: {}", output_path.display());
    if unmatched > 0 {
        println!(
            "{} of {} rows had missing or invalid coordinates",
            unmatched, processed
        );
    }
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_nearest.csv", stem))
}

/// Nearest-facility cells for one row, empty when the row has no usable point.
fn nearest_cells(directory: &FacilityDirectory, lat: &str, lon: &str) -> Option<[String; 3]> {
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;

    let result = directory.nearest(lat, lon, Some(1)).ok()?;
    let nearest = result.results.into_iter().next()?;

    Some([
        nearest.facility.name,
        nearest.facility.address,
        nearest.distance_km.to_string(),
    ])
}

/// Returns the number of rows processed and how many got no match.
fn process_csv(
    directory: &FacilityDirectory,
    input: &Path,
    output_path: &Path,
    lat_col: &str,
    lon_col: &str,
) -> Result<(usize, usize)> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let output_file = File::create(output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.extend(OUTPUT_COLUMNS);
    writer.write_record(&new_headers)?;

    let mut unmatched = 0;
    for record in &records {
        let cells = nearest_cells(
            directory,
            record.get(lat_idx).unwrap_or_default(),
            record.get(lon_idx).unwrap_or_default(),
        );
        if cells.is_none() {
            unmatched += 1;
        }
        let cells = cells.unwrap_or_default();

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.extend(cells.iter().map(String::as_str));
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok((records.len(), unmatched))
}
