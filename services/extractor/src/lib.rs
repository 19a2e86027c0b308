//! Point weather extraction from ERA5 NetCDF files.
//!
//! This module exposes the internal modules for testing purposes.

pub mod error;
pub mod extract;
pub mod output;

pub use error::{ExtractError, ExtractResult};
pub use extract::{check_units, extract_from_path, extract_weather, read_sample};
pub use output::{render, OutputFormat};
