use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{open_directory, print_ranked};

pub fn run(
    directory: Option<PathBuf>,
    lat: f64,
    lon: f64,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let directory = open_directory(directory)?;

    let result = directory
        .nearest(lat, lon, limit)
        .context("Failed to find nearest hospitals")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.results.is_empty() {
        println!("No hospitals loaded");
        return Ok(());
    }

    println!(
        "Nearest {} of {} hospitals to ({}, {}):\n",
        result.total_found, result.total_available, lat, lon
    );
    print_ranked(&result.results);

    Ok(())
}
