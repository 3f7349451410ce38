//! Basic example demonstrating carefind library usage.
//!
//! Run with: cargo run --example basic -- /path/to/hospital_directory.csv

use carefind::{DirectoryError, FacilityDirectory};
use std::env;

fn main() -> Result<(), DirectoryError> {
    // Get directory file from command line
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/hospital_directory.csv");
        std::process::exit(1);
    });

    let directory = FacilityDirectory::load(&path)?;
    let stats = directory.load_stats();
    println!(
        "Loaded {} hospitals ({} rows skipped)",
        directory.len(),
        stats.skipped()
    );

    let locations = [
        ("New Delhi", 28.6139, 77.2090),
        ("Mumbai", 19.0760, 72.8777),
        ("Bengaluru", 12.9716, 77.5946),
    ];

    for (name, lat, lon) in &locations {
        println!("\nNearest to {}:", name);
        println!("{:-<50}", "");

        match directory.nearest(*lat, *lon, Some(3)) {
            Ok(result) if result.results.is_empty() => println!("no hospitals loaded"),
            Ok(result) => {
                for hospital in &result.results {
                    println!(
                        "{} - {} ({})",
                        hospital.facility.name,
                        hospital.facility.address,
                        hospital.distance_formatted
                    );
                }
            }
            Err(e) => println!("error - {}", e),
        }
    }

    let within = directory.within_radius(28.6139, 77.2090, Some(25.0))?;
    println!(
        "\n{} hospitals within {} km of New Delhi",
        within.count, within.radius_km
    );

    Ok(())
}
