//! Error types shared across the ERA5 tools.

use thiserror::Error;

/// Result type alias using Era5Error.
pub type Era5Result<T> = Result<T, Era5Error>;

/// Primary error type for request construction and result serialization.
#[derive(Debug, Error)]
pub enum Era5Error {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl Era5Error {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        Era5Error::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Era5Error {
    fn from(err: serde_json::Error) -> Self {
        Era5Error::Serialization(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for Era5Error {
    fn from(err: std::io::Error) -> Self {
        Era5Error::Serialization(err.to_string())
    }
}
