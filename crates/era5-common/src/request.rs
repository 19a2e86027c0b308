//! Retrieval request sent to the climate data archive.
//!
//! A request can be loaded from YAML; every field is optional and falls back
//! to the ERA5 single-levels defaults:
//!
//! ```yaml
//! dataset: reanalysis-era5-single-levels
//! product_type: reanalysis
//! variables:
//!   - 2m_temperature
//!   - 10m_u_component_of_wind
//! date: 2025-02-25
//! time: "12:00"
//! format: netcdf
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Era5Error, Era5Result};
use crate::variables;

/// Default archive dataset.
pub const DEFAULT_DATASET: &str = "reanalysis-era5-single-levels";

/// Default product type within the dataset.
pub const DEFAULT_PRODUCT_TYPE: &str = "reanalysis";

/// Format string used for request times.
pub const TIME_FORMAT: &str = "%H:%M";

/// File format of the retrieved data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Netcdf,
    Grib,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Netcdf => "netcdf",
            DataFormat::Grib => "grib",
        }
    }

    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Netcdf => "nc",
            DataFormat::Grib => "grib",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = Era5Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "netcdf" | "nc" => Ok(DataFormat::Netcdf),
            "grib" | "grib2" => Ok(DataFormat::Grib),
            other => Err(Era5Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parameters of a single archive retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_product_type")]
    pub product_type: String,
    #[serde(default = "variables::request_names", alias = "variable")]
    pub variables: Vec<String>,
    #[serde(default = "default_date")]
    pub date: NaiveDate,
    #[serde(default = "default_time", with = "hour_minute")]
    pub time: NaiveTime,
    #[serde(default, alias = "data_format")]
    pub format: DataFormat,
}

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

fn default_product_type() -> String {
    DEFAULT_PRODUCT_TYPE.to_string()
}

fn default_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 25).unwrap_or_default()
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// First day covered by the ERA5 archive.
pub fn archive_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or_default()
}

impl Default for RetrievalRequest {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            product_type: default_product_type(),
            variables: variables::request_names(),
            date: default_date(),
            time: default_time(),
            format: DataFormat::default(),
        }
    }
}

impl RetrievalRequest {
    /// Check the fields the archive would otherwise reject after queueing.
    pub fn validate(&self) -> Era5Result<()> {
        if self.dataset.trim().is_empty() {
            return Err(Era5Error::MissingParameter("dataset".to_string()));
        }
        if self.product_type.trim().is_empty() {
            return Err(Era5Error::MissingParameter("product_type".to_string()));
        }
        if self.variables.is_empty() {
            return Err(Era5Error::MissingParameter("variables".to_string()));
        }
        if self.time.minute() != 0 || self.time.second() != 0 {
            return Err(Era5Error::invalid(
                "time",
                format!(
                    "{} is not on the hour; the product is hourly",
                    self.time.format(TIME_FORMAT)
                ),
            ));
        }
        if self.date < archive_start() {
            return Err(Era5Error::invalid(
                "date",
                format!("{} is before the archive start {}", self.date, archive_start()),
            ));
        }
        Ok(())
    }

    /// Request body inputs in the form the archive's process API expects.
    ///
    /// `download_format` is pinned to `unarchived` so a single-file result is
    /// delivered as-is instead of wrapped in a zip.
    pub fn to_inputs(&self) -> Value {
        json!({
            "product_type": [self.product_type],
            "variable": self.variables,
            "year": [format!("{:04}", self.date.year())],
            "month": [format!("{:02}", self.date.month())],
            "day": [format!("{:02}", self.date.day())],
            "time": [self.time.format(TIME_FORMAT).to_string()],
            "data_format": self.format.as_str(),
            "download_format": "unarchived",
        })
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_hour_minute(s: &str) -> Era5Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|e| Era5Error::invalid("time", format!("'{}' is not HH:MM: {}", s, e)))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Era5Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Era5Error::invalid("date", format!("'{}' is not YYYY-MM-DD: {}", s, e)))
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hour_minute(&s).map_err(serde::de::Error::custom)
    }
}
