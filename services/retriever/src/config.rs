//! Request configuration.
//!
//! The request starts from built-in defaults, is optionally replaced by a
//! YAML file, and individual fields are then overridden from the command line.

use std::path::Path;

use anyhow::{Context, Result};
use era5_common::request::{parse_date, parse_hour_minute};
use era5_common::{DataFormat, Era5Variable, RetrievalRequest};
use tracing::{debug, info};

/// Command-line overrides for individual request fields.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub dataset: Option<String>,
    pub product_type: Option<String>,
    pub variables: Vec<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub format: Option<DataFormat>,
}

/// Load a request from `path`, or the default request when no file is given.
pub fn load_request(path: Option<&Path>) -> Result<RetrievalRequest> {
    let Some(path) = path else {
        debug!("No request file, using defaults");
        return Ok(RetrievalRequest::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    let request: RetrievalRequest = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse request file: {}", path.display()))?;

    info!(path = %path.display(), dataset = %request.dataset, "Loaded request file");
    Ok(request)
}

/// Apply command-line overrides on top of `request`.
pub fn apply_overrides(
    mut request: RetrievalRequest,
    overrides: &RequestOverrides,
) -> Result<RetrievalRequest> {
    if let Some(dataset) = &overrides.dataset {
        request.dataset = dataset.clone();
    }
    if let Some(product_type) = &overrides.product_type {
        request.product_type = product_type.clone();
    }
    if !overrides.variables.is_empty() {
        request.variables = overrides
            .variables
            .iter()
            .map(|name| request_variable_name(name))
            .collect();
    }
    if let Some(date) = &overrides.date {
        request.date = parse_date(date)?;
    }
    if let Some(time) = &overrides.time {
        request.time = parse_hour_minute(time)?;
    }
    if let Some(format) = overrides.format {
        request.format = format;
    }
    Ok(request)
}

/// Archive name for `name`; known short names such as `t2m` are expanded.
///
/// Other names are passed through for the archive to judge.
fn request_variable_name(name: &str) -> String {
    Era5Variable::from_name(name)
        .map(|v| v.request_name().to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_gives_defaults() {
        assert_eq!(load_request(None).unwrap(), RetrievalRequest::default());
    }

    #[test]
    fn test_load_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.yaml");
        std::fs::write(
            &path,
            "variables:\n  - 2m_temperature\ndate: 2023-08-15\ntime: \"18:00\"\n",
        )
        .unwrap();

        let request = load_request(Some(&path)).unwrap();
        assert_eq!(request.variables, vec!["2m_temperature".to_string()]);
        assert_eq!(request.date.to_string(), "2023-08-15");
        assert_eq!(request.dataset, "reanalysis-era5-single-levels");
    }

    #[test]
    fn test_missing_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_request(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read request file"));
    }

    #[test]
    fn test_overrides_win() {
        let overrides = RequestOverrides {
            date: Some("2024-01-31".to_string()),
            time: Some("00:00".to_string()),
            format: Some(DataFormat::Grib),
            variables: vec!["2m_dewpoint_temperature".to_string()],
            ..Default::default()
        };
        let request = apply_overrides(RetrievalRequest::default(), &overrides).unwrap();
        assert_eq!(request.date.to_string(), "2024-01-31");
        assert_eq!(request.time.to_string(), "00:00:00");
        assert_eq!(request.format, DataFormat::Grib);
        assert_eq!(request.variables.len(), 1);
        assert_eq!(request.product_type, "reanalysis");
    }

    #[test]
    fn test_short_variable_names_are_expanded() {
        let overrides = RequestOverrides {
            variables: vec![
                "t2m".to_string(),
                "10m_u_component_of_wind".to_string(),
                "total_precipitation".to_string(),
            ],
            ..Default::default()
        };
        let request = apply_overrides(RetrievalRequest::default(), &overrides).unwrap();
        assert_eq!(
            request.variables,
            vec![
                "2m_temperature",
                "10m_u_component_of_wind",
                "total_precipitation",
            ]
        );
    }

    #[test]
    fn test_bad_override_date() {
        let overrides = RequestOverrides {
            date: Some("31/01/2024".to_string()),
            ..Default::default()
        };
        assert!(apply_overrides(RetrievalRequest::default(), &overrides).is_err());
    }
}
