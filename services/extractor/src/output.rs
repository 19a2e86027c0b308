//! Rendering of the weather summary.

use clap::ValueEnum;
use era5_common::WeatherResult;

use crate::error::ExtractResult;

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object on a single line
    #[default]
    Json,
    /// Labelled lines with units
    Text,
}

/// Render `result` in `format`, without a trailing newline.
pub fn render(result: &WeatherResult, format: OutputFormat) -> ExtractResult<String> {
    match format {
        OutputFormat::Json => Ok(result.to_json_line()?),
        OutputFormat::Text => Ok(result.to_text()),
    }
}
