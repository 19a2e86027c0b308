//! Caller-supplied query coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
///
/// Neither coordinate is validated or normalized. The longitude must use the
/// same convention (-180..180 or 0..360) as the grid it is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl QueryPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for QueryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
