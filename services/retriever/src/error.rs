//! Error types for archive retrieval.

use era5_common::Era5Error;
use thiserror::Error;

/// Result type for retrieval operations.
pub type RetrieveResult<T> = Result<T, RetrieveError>;

#[derive(Error, Debug)]
pub enum RetrieveError {
    /// The request itself is invalid
    #[error("Invalid request: {0}")]
    Request(#[from] Era5Error),

    /// Missing or unusable local configuration (credentials, URLs)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The archive rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The archive answered with a non-success status
    #[error("Archive returned HTTP {status}: {detail}")]
    Service { status: u16, detail: String },

    /// The job ended without producing a result
    #[error("Job {job_id} did not complete: {reason}")]
    JobFailed { job_id: String, reason: String },

    /// The downloaded file does not match the advertised size
    #[error("Download size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed archive response: {0}")]
    Json(#[from] serde_json::Error),
}
