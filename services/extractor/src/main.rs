//! ERA5 point extractor.
//!
//! Usage: `extractor <latitude> <longitude> <file_path>`
//!
//! Prints one line such as
//! `{"temperature": 26.9, "wind_speed": 5.0, "humidity": 54.3}` for the grid
//! cell nearest to the query point. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use era5_common::QueryPoint;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use extractor::{extract_from_path, render, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "extractor")]
#[command(about = "Weather summary at the grid point nearest to a coordinate")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Latitude in degrees
    latitude: f64,

    /// Longitude in degrees, in the same convention as the file's grid
    longitude: f64,

    /// NetCDF file produced by the retriever
    file_path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let point = QueryPoint::new(args.latitude, args.longitude);
    let result = extract_from_path(&args.file_path, point).with_context(|| {
        format!(
            "Failed to extract weather at {} from {}",
            point,
            args.file_path.display()
        )
    })?;

    println!("{}", render(&result, args.format)?);
    Ok(())
}
