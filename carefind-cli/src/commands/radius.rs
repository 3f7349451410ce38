use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{open_directory, print_ranked};

pub fn run(
    directory: Option<PathBuf>,
    lat: f64,
    lon: f64,
    radius_km: Option<f64>,
    json: bool,
) -> Result<()> {
    let directory = open_directory(directory)?;

    let result = directory
        .within_radius(lat, lon, radius_km)
        .context("Failed to search within radius")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.results.is_empty() {
        println!("No hospitals within {} km of ({}, {})", result.radius_km, lat, lon);
        return Ok(());
    }

    println!(
        "{} hospitals within {} km of ({}, {}):\n",
        result.count, result.radius_km, lat, lon
    );
    print_ranked(&result.results);

    Ok(())
}
