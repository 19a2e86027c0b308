//! Meteorological conversions applied to a single grid cell.
//!
//! All functions work in `f64`; values stored as `f32` in the source file are
//! widened before they reach this module.

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Magnus coefficient `b` (dimensionless).
pub const MAGNUS_B: f64 = 17.625;

/// Magnus coefficient `c` (degrees Celsius).
pub const MAGNUS_C: f64 = 243.04;

/// Kelvin to Celsius: C = K - 273.15
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Horizontal wind speed from its eastward (`u`) and northward (`v`) components.
pub fn wind_speed(u: f64, v: f64) -> f64 {
    (u * u + v * v).sqrt()
}

fn magnus_exponent(celsius: f64) -> f64 {
    (MAGNUS_B * celsius) / (MAGNUS_C + celsius)
}

/// Relative humidity (%) from air temperature and dewpoint, both in Celsius.
///
/// Uses the Magnus approximation
/// `RH = 100 * exp(b*Td / (c+Td)) / exp(b*T / (c+T))`. The two exponentials
/// are evaluated separately and divided, not folded into `exp(a - b)`.
///
/// The formula is singular at -243.04 °C, far outside any atmospheric value.
pub fn relative_humidity(temperature_c: f64, dewpoint_c: f64) -> f64 {
    100.0 * magnus_exponent(dewpoint_c).exp() / magnus_exponent(temperature_c).exp()
}

/// Round to one decimal place.
///
/// Rounding is done on the exact decimal expansion of the double, with exact
/// ties going to the even digit. `(x * 10.0).round() / 10.0` is not equivalent: `0.35` is stored as
/// `0.34999…` and must round down, but `0.35 * 10.0` is exactly `3.5`.
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}
