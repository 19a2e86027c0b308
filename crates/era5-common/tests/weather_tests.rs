//! Tests for the derived weather summary and request loading.

use era5_common::meteo::{kelvin_to_celsius, relative_humidity, wind_speed};
use era5_common::{DataFormat, Era5Variable, PointSample, RetrievalRequest, WeatherResult};
use test_utils::assert_approx_eq;

// ============================================================================
// Derived quantities
// ============================================================================

#[test]
fn test_wind_speed_matches_norm_over_grid() {
    for u in [-12.5, -3.0, 0.0, 0.25, 7.0] {
        for v in [-8.0, 0.0, 1.5, 4.0] {
            assert_approx_eq!(wind_speed(u, v), (u * u + v * v).sqrt(), 1e-12);
        }
    }
}

#[test]
fn test_calm_wind_serializes_as_zero() {
    let result = WeatherResult::from_sample(&PointSample {
        t2m: 285.0,
        u10: 0.0,
        v10: 0.0,
        d2m: 280.0,
    });
    assert_eq!(result.wind_speed, 0.0);
    assert!(result.to_json_line().unwrap().contains(r#""wind_speed": 0.0"#));
}

#[test]
fn test_humidity_decreases_as_dewpoint_drops() {
    let t = 20.0;
    let mut previous = relative_humidity(t, t);
    for depression in [1.0, 5.0, 10.0, 20.0, 40.0, 60.0] {
        let rh = relative_humidity(t, t - depression);
        assert!(rh < previous);
        assert!(rh > 0.0);
        previous = rh;
    }
}

#[test]
fn test_end_to_end_sample() {
    let sample = PointSample {
        t2m: 300.0,
        u10: 3.0,
        v10: 4.0,
        d2m: 290.0,
    };
    assert_approx_eq!(kelvin_to_celsius(sample.t2m), 26.85, 1e-9);
    assert_approx_eq!(kelvin_to_celsius(sample.d2m), 16.85, 1e-9);

    let line = WeatherResult::from_sample(&sample).to_json_line().unwrap();
    assert_eq!(
        line,
        r#"{"temperature": 26.9, "wind_speed": 5.0, "humidity": 54.3}"#
    );
}

#[test]
fn test_json_line_parses_back() {
    let result = WeatherResult {
        temperature: -12.4,
        wind_speed: 11.0,
        humidity: 87.6,
    };
    let line = result.to_json_line().unwrap();
    let parsed: WeatherResult = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed, result);
    assert!(!line.contains('\n'));
}

// ============================================================================
// Request loading
// ============================================================================

#[test]
fn test_request_from_empty_yaml_uses_defaults() {
    let req: RetrievalRequest = serde_yaml::from_str("{}").unwrap();
    assert_eq!(req, RetrievalRequest::default());
}

#[test]
fn test_request_from_yaml() {
    let yaml = r#"
dataset: reanalysis-era5-single-levels
product_type: reanalysis
variable:
  - 2m_temperature
  - 2m_dewpoint_temperature
date: 2024-07-01
time: "06:00"
data_format: grib
"#;
    let req: RetrievalRequest = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(req.variables.len(), 2);
    assert_eq!(req.date.to_string(), "2024-07-01");
    assert_eq!(req.format, DataFormat::Grib);

    let inputs = req.to_inputs();
    assert_eq!(inputs["time"][0], "06:00");
    assert_eq!(inputs["month"][0], "07");
    assert_eq!(inputs["data_format"], "grib");
}

#[test]
fn test_request_rejects_bad_time_in_yaml() {
    let result: Result<RetrievalRequest, _> = serde_yaml::from_str(r#"time: "half past""#);
    assert!(result.is_err());
}

#[test]
fn test_default_variables_cover_summary() {
    let req = RetrievalRequest::default();
    for var in Era5Variable::ALL {
        assert!(req.variables.iter().any(|v| v == var.request_name()));
    }
}
