use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Nearest-hospital search CLI tool
#[derive(Parser)]
#[command(name = "carefind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Hospital directory CSV file
    #[arg(short, long, env = "CAREFIND_DIRECTORY", global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the hospitals nearest to a coordinate
    Nearest {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Number of results (default 5, at most 20)
        #[arg(short, long)]
        limit: Option<i64>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find every hospital within a radius of a coordinate
    Radius {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in kilometers (default 50, at most 500)
        #[arg(short, long)]
        radius_km: Option<f64>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List hospitals, optionally filtered by name
    List {
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,

        /// Output as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
    },

    /// Show the number of loaded hospitals
    Count,

    /// Append the nearest hospital to every row of a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_nearest.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Nearest {
            lat,
            lon,
            limit,
            json,
        } => commands::nearest::run(cli.directory, lat, lon, limit, json),
        Commands::Radius {
            lat,
            lon,
            radius_km,
            json,
        } => commands::radius::run(cli.directory, lat, lon, radius_km, json),
        Commands::List { search, geojson } => commands::list::run(cli.directory, search, geojson),
        Commands::Count => commands::count::run(cli.directory),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(cli.directory, input, output, lat_col, lon_col),
    }
}
