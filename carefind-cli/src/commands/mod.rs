pub mod batch;
pub mod count;
pub mod list;
pub mod nearest;
pub mod radius;

use anyhow::{Context, Result};
use carefind::{FacilityDirectory, FacilityDirectoryBuilder, QueryLimits, RankedFacility};
use std::path::PathBuf;

/// Load the directory from `--directory`, falling back to `CAREFIND_DIRECTORY`.
pub fn open_directory(directory: Option<PathBuf>) -> Result<FacilityDirectory> {
    let builder = match directory {
        Some(path) => FacilityDirectoryBuilder::new(path).limits(QueryLimits::from_env()),
        None => FacilityDirectoryBuilder::from_env().context(
            "CAREFIND_DIRECTORY environment variable not set. Use --directory or set CAREFIND_DIRECTORY",
        )?,
    };

    builder
        .build()
        .context("Failed to load hospital directory")
}

/// Print ranked results as an aligned table.
pub fn print_ranked(results: &[RankedFacility]) {
    println!("{:>4}  {:<40} {:>12}  ADDRESS", "#", "NAME", "DISTANCE");
    println!("{}", "-".repeat(80));

    for (i, r) in results.iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:>12}  {}",
            i + 1,
            truncate(&r.facility.name, 40),
            r.distance_formatted,
            r.facility.address
        );
    }
}

/// Cut `s` to at most `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
