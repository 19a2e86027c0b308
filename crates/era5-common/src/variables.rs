//! The ERA5 single-level variables used for a point weather summary.

use serde::{Deserialize, Serialize};

/// A variable of the ERA5 single-levels product.
///
/// The archive service addresses variables by a long request name, while the
/// NetCDF files it produces name them with short codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era5Variable {
    /// Air temperature 2 m above the surface (K)
    Temperature2m,
    /// Eastward wind component 10 m above the surface (m/s)
    UWind10m,
    /// Northward wind component 10 m above the surface (m/s)
    VWind10m,
    /// Dewpoint temperature 2 m above the surface (K)
    Dewpoint2m,
}

impl Era5Variable {
    /// Every variable needed for a weather summary, in request order.
    pub const ALL: [Era5Variable; 4] = [
        Era5Variable::Temperature2m,
        Era5Variable::UWind10m,
        Era5Variable::VWind10m,
        Era5Variable::Dewpoint2m,
    ];

    /// Name used in retrieval requests.
    pub fn request_name(&self) -> &'static str {
        match self {
            Self::Temperature2m => "2m_temperature",
            Self::UWind10m => "10m_u_component_of_wind",
            Self::VWind10m => "10m_v_component_of_wind",
            Self::Dewpoint2m => "2m_dewpoint_temperature",
        }
    }

    /// Variable name inside the downloaded NetCDF file.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Temperature2m => "t2m",
            Self::UWind10m => "u10",
            Self::VWind10m => "v10",
            Self::Dewpoint2m => "d2m",
        }
    }

    /// Native units of the stored values.
    pub fn units(&self) -> &'static str {
        match self {
            Self::Temperature2m | Self::Dewpoint2m => "K",
            Self::UWind10m | Self::VWind10m => "m s**-1",
        }
    }

    /// Look up a variable by its request name or short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.request_name() == name || v.short_name() == name)
    }
}

/// Request names of all summary variables.
pub fn request_names() -> Vec<String> {
    Era5Variable::ALL
        .iter()
        .map(|v| v.request_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        let names: Vec<_> = Era5Variable::ALL.iter().map(|v| v.short_name()).collect();
        assert_eq!(names, vec!["t2m", "u10", "v10", "d2m"]);
    }

    #[test]
    fn test_from_name_accepts_both_forms() {
        assert_eq!(
            Era5Variable::from_name("2m_dewpoint_temperature"),
            Some(Era5Variable::Dewpoint2m)
        );
        assert_eq!(Era5Variable::from_name("u10"), Some(Era5Variable::UWind10m));
        assert_eq!(Era5Variable::from_name("msl"), None);
    }

    #[test]
    fn test_request_names_order() {
        assert_eq!(
            request_names(),
            vec![
                "2m_temperature",
                "10m_u_component_of_wind",
                "10m_v_component_of_wind",
                "2m_dewpoint_temperature",
            ]
        );
    }
}
