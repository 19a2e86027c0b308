//! Error types for point extraction.

use era5_common::Era5Error;
use netcdf_parser::NetCdfError;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Opening or reading the dataset failed
    #[error(transparent)]
    Dataset(#[from] NetCdfError),

    /// Rendering the result failed
    #[error(transparent)]
    Output(#[from] Era5Error),
}
