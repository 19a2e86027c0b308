//! Raw grid-cell samples and the derived weather summary.

use serde::{Deserialize, Serialize};

use crate::error::Era5Result;
use crate::json;
use crate::meteo::{kelvin_to_celsius, relative_humidity, round_to_tenth, wind_speed};

/// Values of the four summary variables at one grid cell, in native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSample {
    /// 2 m temperature (K)
    pub t2m: f64,
    /// 10 m eastward wind (m/s)
    pub u10: f64,
    /// 10 m northward wind (m/s)
    pub v10: f64,
    /// 2 m dewpoint temperature (K)
    pub d2m: f64,
}

/// Weather summary for a single point, each field rounded to one decimal.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Relative humidity (%)
    pub humidity: f64,
}

impl WeatherResult {
    /// Derive the summary from a raw sample.
    ///
    /// Humidity is computed from the unrounded Celsius values; rounding is the
    /// last step.
    pub fn from_sample(sample: &PointSample) -> Self {
        let temperature = kelvin_to_celsius(sample.t2m);
        let dewpoint = kelvin_to_celsius(sample.d2m);
        let speed = wind_speed(sample.u10, sample.v10);
        let humidity = relative_humidity(temperature, dewpoint);

        Self {
            temperature: round_to_tenth(temperature),
            wind_speed: round_to_tenth(speed),
            humidity: round_to_tenth(humidity),
        }
    }

    /// Single-line JSON rendering, e.g.
    /// `{"temperature": 26.9, "wind_speed": 5.0, "humidity": 54.3}`.
    pub fn to_json_line(&self) -> Era5Result<String> {
        json::to_spaced_string(self)
    }

    /// Human-readable multi-line summary.
    pub fn to_text(&self) -> String {
        format!(
            "Temperature: {:.1}°C\nWind Speed: {:.1} m/s\nRelative Humidity: {:.1}%",
            self.temperature, self.wind_speed, self.humidity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointSample {
        PointSample {
            t2m: 300.0,
            u10: 3.0,
            v10: 4.0,
            d2m: 290.0,
        }
    }

    #[test]
    fn test_from_sample() {
        let result = WeatherResult::from_sample(&sample());
        assert_eq!(result.temperature, 26.9);
        assert_eq!(result.wind_speed, 5.0);
        assert_eq!(result.humidity, 54.3);
    }

    #[test]
    fn test_json_line() {
        let line = WeatherResult::from_sample(&sample()).to_json_line().unwrap();
        assert_eq!(
            line,
            r#"{"temperature": 26.9, "wind_speed": 5.0, "humidity": 54.3}"#
        );
    }

    #[test]
    fn test_saturated_air() {
        let result = WeatherResult::from_sample(&PointSample {
            t2m: 280.0,
            u10: 0.0,
            v10: 0.0,
            d2m: 280.0,
        });
        assert_eq!(result.humidity, 100.0);
        assert_eq!(result.wind_speed, 0.0);
        assert_eq!(result.temperature, 6.9);
    }

    #[test]
    fn test_text_summary() {
        let text = WeatherResult::from_sample(&sample()).to_text();
        assert_eq!(
            text,
            "Temperature: 26.9°C\nWind Speed: 5.0 m/s\nRelative Humidity: 54.3%"
        );
    }
}
