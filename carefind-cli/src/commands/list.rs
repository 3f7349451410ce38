use anyhow::Result;
use carefind::geojson::facilities_to_feature_collection;
use std::path::PathBuf;

use super::open_directory;

pub fn run(directory: Option<PathBuf>, search: Option<String>, geojson: bool) -> Result<()> {
    let directory = open_directory(directory)?;
    let listing = directory.list_all(search.as_deref());

    if geojson {
        let collection = facilities_to_feature_collection(&listing.results);
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(());
    }

    if listing.results.is_empty() {
        match search {
            Some(term) => println!("No hospitals matching: {}", term),
            None => println!("No hospitals loaded from: {}", directory.source().display()),
        }
        return Ok(());
    }

    println!("{:<40} {:>10} {:>11}  ADDRESS", "NAME", "LATITUDE", "LONGITUDE");
    println!("{}", "-".repeat(80));

    for f in &listing.results {
        println!(
            "{:<40} {:>10.4} {:>11.4}  {}",
            f.name, f.latitude, f.longitude, f.address
        );
    }

    println!("{}", "-".repeat(80));
    println!("Total: {} hospitals", listing.total);

    Ok(())
}
