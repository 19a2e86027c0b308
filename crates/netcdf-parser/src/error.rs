//! Error types for NetCDF reading operations.

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable, dimension or coordinate
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// File could not be decoded, or its layout is not a lat/lon grid
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// The query cannot be resolved against the grid
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The selected cell holds a fill value
    #[error("No data for '{variable}' at latitude {latitude}, longitude {longitude}")]
    NoData {
        variable: String,
        latitude: f64,
        longitude: f64,
    },
}
