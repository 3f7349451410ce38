use anyhow::Result;
use std::path::PathBuf;

use super::open_directory;

pub fn run(directory: Option<PathBuf>) -> Result<()> {
    let directory = open_directory(directory)?;
    let count = directory.count();
    let stats = directory.load_stats();

    println!("Directory: {}", directory.source().display());
    println!("Hospitals: {} ({})", count.total, count.status.as_str());
    println!("Rows read: {}", stats.rows_read);

    if stats.skipped() > 0 {
        println!(
            "Skipped:   {} ({} unreadable, {} without valid coordinates)",
            stats.skipped(),
            stats.malformed_rows,
            stats.invalid_coordinates
        );
    }

    Ok(())
}
