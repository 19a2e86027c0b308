//! ERA5 retriever.
//!
//! Submits one request to the climate data archive, waits for the job to
//! finish and saves the result (by default to `output.nc`).

mod client;
mod config;
mod credentials;
mod error;
mod retrieve;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use era5_common::DataFormat;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use client::CdsClient;
use config::RequestOverrides;
use credentials::Credentials;
use retrieve::{retrieve, PollConfig};

#[derive(Parser, Debug)]
#[command(name = "retriever")]
#[command(about = "Download one ERA5 time slice from the climate data archive")]
struct Args {
    /// YAML file describing the request (defaults are used when omitted)
    #[arg(long)]
    request: Option<PathBuf>,

    /// Dataset name
    #[arg(long)]
    dataset: Option<String>,

    /// Product type within the dataset
    #[arg(long)]
    product_type: Option<String>,

    /// Variable to request, by archive or short name (repeatable; replaces the request's list)
    #[arg(long = "variable")]
    variables: Vec<String>,

    /// Date to retrieve (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Hour to retrieve (HH:MM)
    #[arg(long)]
    time: Option<String>,

    /// Output file format (netcdf or grib)
    #[arg(long)]
    format: Option<DataFormat>,

    /// Output file
    #[arg(short, long, default_value = "output.nc")]
    output: PathBuf,

    /// Archive API URL
    #[arg(long, env = "CDSAPI_URL")]
    url: Option<String>,

    /// Archive API key
    #[arg(long, env = "CDSAPI_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Credentials file (defaults to ~/.cdsapirc)
    #[arg(long, env = "CDSAPI_RC")]
    rc_file: Option<PathBuf>,

    /// First job status poll delay in seconds
    #[arg(long, default_value = "1")]
    poll_initial_secs: u64,

    /// Longest job status poll delay in seconds
    #[arg(long, default_value = "120")]
    poll_max_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "600")]
    timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let request = config::load_request(args.request.as_deref())?;
    let overrides = RequestOverrides {
        dataset: args.dataset,
        product_type: args.product_type,
        variables: args.variables,
        date: args.date,
        time: args.time,
        format: args.format,
    };
    let request = config::apply_overrides(request, &overrides)?;
    request.validate().context("Invalid retrieval request")?;

    let output_extension = args.output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if request.format.extension() != output_extension {
        warn!(
            format = %request.format,
            output = %args.output.display(),
            "Output file extension does not match the requested format"
        );
    }

    let credentials = Credentials::resolve(args.url, args.key, args.rc_file.as_deref())
        .context("Failed to load archive credentials")?;
    info!(
        url = %credentials.url,
        dataset = %request.dataset,
        date = %request.date,
        time = %request.time.format(era5_common::request::TIME_FORMAT),
        variables = ?request.variables,
        "Starting retrieval"
    );

    let client = CdsClient::new(credentials, Duration::from_secs(args.timeout_secs))
        .context("Failed to create HTTP client")?;
    let poll = PollConfig {
        initial_delay: Duration::from_secs(args.poll_initial_secs.max(1)),
        max_delay: Duration::from_secs(args.poll_max_secs.max(args.poll_initial_secs)),
        ..Default::default()
    };

    let summary = retrieve(&client, &request, &args.output, &poll)
        .await
        .with_context(|| format!("Retrieval into {} failed", args.output.display()))?;

    info!(
        job_id = %summary.job_id,
        bytes = summary.bytes,
        status_checks = summary.status_checks,
        "Saved {}",
        summary.path.display()
    );
    println!("Data downloaded successfully");
    Ok(())
}
