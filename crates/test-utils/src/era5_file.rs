//! Writer for small synthetic NetCDF files shaped like ERA5 downloads.
//!
//! Archive files have a `valid_time` dimension of length 1 followed by
//! `latitude` (north to south) and `longitude`, with one `f32` variable per
//! short name. [`Era5Fixture`] reproduces that layout so readers can be
//! tested without network access.
//!
//! ```ignore
//! use test_utils::{grid, samples, Era5Fixture};
//!
//! let dir = test_utils::temp_test_dir();
//! let path = Era5Fixture::uniform(grid::EAST_US_1DEG, samples::WARM)
//!     .write(dir.path().join("output.nc"))
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::fixtures::grid::GridSpec;
use crate::fixtures::samples::Sample;
use crate::generators::create_constant_grid;

/// ERA5 short names in archive order.
pub const ERA5_SHORT_NAMES: [&str; 4] = ["t2m", "u10", "v10", "d2m"];

/// Units attribute written for a short name unless overridden.
pub fn default_units(name: &str) -> Option<&'static str> {
    match name {
        "t2m" | "d2m" => Some("K"),
        "u10" | "v10" => Some("m s**-1"),
        _ => None,
    }
}

/// Stored representation of a data variable.
#[derive(Debug, Clone)]
pub enum FieldData {
    /// Plain `f32` values with an optional `_FillValue`
    Float { values: Vec<f32>, fill: Option<f32> },
    /// `i16` values packed with `scale_factor` and `add_offset`
    Packed {
        raw: Vec<i16>,
        scale_factor: f64,
        add_offset: f64,
        fill: i16,
    },
}

/// Builder for a synthetic ERA5-style NetCDF file.
#[derive(Debug, Clone)]
pub struct Era5Fixture {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    time_dim: bool,
    coordinate_names: (String, String),
    fields: Vec<(String, FieldData)>,
    units: Vec<(String, String)>,
}

impl Era5Fixture {
    /// Start a file with the given coordinate labels and no data variables.
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            latitudes,
            longitudes,
            time_dim: true,
            coordinate_names: ("latitude".to_string(), "longitude".to_string()),
            fields: Vec::new(),
            units: Vec::new(),
        }
    }

    /// A file on `spec` where every cell holds the same `sample`.
    pub fn uniform(spec: GridSpec, sample: Sample) -> Self {
        let (rows, cols) = spec.shape();
        Self::new(spec.latitudes(), spec.longitudes())
            .field("t2m", create_constant_grid(cols, rows, sample.t2m))
            .field("u10", create_constant_grid(cols, rows, sample.u10))
            .field("v10", create_constant_grid(cols, rows, sample.v10))
            .field("d2m", create_constant_grid(cols, rows, sample.d2m))
    }

    /// Add or replace a plain `f32` variable laid out as (latitude, longitude).
    pub fn field(self, name: &str, values: Vec<f32>) -> Self {
        self.with_data(name, FieldData::Float { values, fill: None })
    }

    /// Add or replace an `f32` variable that declares `_FillValue`.
    pub fn field_with_fill(self, name: &str, values: Vec<f32>, fill: f32) -> Self {
        self.with_data(
            name,
            FieldData::Float {
                values,
                fill: Some(fill),
            },
        )
    }

    /// Add or replace a packed `i16` variable.
    pub fn packed_field(
        self,
        name: &str,
        raw: Vec<i16>,
        scale_factor: f64,
        add_offset: f64,
        fill: i16,
    ) -> Self {
        self.with_data(
            name,
            FieldData::Packed {
                raw,
                scale_factor,
                add_offset,
                fill,
            },
        )
    }

    /// Drop a variable, e.g. to produce an incomplete download.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self
    }

    /// Write `units` on variable `name` instead of its default.
    pub fn units(mut self, name: &str, units: &str) -> Self {
        self.units.retain(|(n, _)| n != name);
        self.units.push((name.to_string(), units.to_string()));
        self
    }

    fn units_of(&self, name: &str) -> Option<&str> {
        self.units
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, u)| u.as_str())
            .or_else(|| default_units(name))
    }

    /// Lay variables out as (latitude, longitude) with no time dimension.
    pub fn without_time_dim(mut self) -> Self {
        self.time_dim = false;
        self
    }

    /// Use `lat`/`lon` instead of `latitude`/`longitude`.
    pub fn short_coordinate_names(mut self) -> Self {
        self.coordinate_names = ("lat".to_string(), "lon".to_string());
        self
    }

    fn with_data(mut self, name: &str, data: FieldData) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self.fields.push((name.to_string(), data));
        self
    }

    /// Write the file to `path` and return the path.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, netcdf::Error> {
        let path = path.as_ref();
        let (lat_name, lon_name) = (&self.coordinate_names.0, &self.coordinate_names.1);
        let mut file = netcdf::create(path)?;

        file.add_dimension(lat_name, self.latitudes.len())?;
        file.add_dimension(lon_name, self.longitudes.len())?;
        if self.time_dim {
            file.add_dimension("valid_time", 1)?;
        }
        file.add_attribute("Conventions", "CF-1.7")?;

        {
            let mut lat_var = file.add_variable::<f64>(lat_name, &[lat_name.as_str()])?;
            lat_var.put_attribute("standard_name", "latitude")?;
            lat_var.put_attribute("units", "degrees_north")?;
            lat_var.put_values(&self.latitudes, ..)?;
        }
        {
            let mut lon_var = file.add_variable::<f64>(lon_name, &[lon_name.as_str()])?;
            lon_var.put_attribute("standard_name", "longitude")?;
            lon_var.put_attribute("units", "degrees_east")?;
            lon_var.put_values(&self.longitudes, ..)?;
        }
        if self.time_dim {
            let mut time_var = file.add_variable::<i64>("valid_time", &["valid_time"])?;
            time_var.put_attribute("standard_name", "time")?;
            time_var.put_attribute("units", "seconds since 1970-01-01")?;
            time_var.put_values(&[1_740_484_800i64], ..)?;
        }

        let dims: Vec<&str> = if self.time_dim {
            vec!["valid_time", lat_name.as_str(), lon_name.as_str()]
        } else {
            vec![lat_name.as_str(), lon_name.as_str()]
        };

        for (name, data) in &self.fields {
            match data {
                FieldData::Float { values, fill } => {
                    let mut var = file.add_variable::<f32>(name, &dims)?;
                    if let Some(units) = self.units_of(name) {
                        var.put_attribute("units", units)?;
                    }
                    if let Some(fill) = fill {
                        var.put_attribute("_FillValue", *fill)?;
                    }
                    var.put_values(values, ..)?;
                }
                FieldData::Packed {
                    raw,
                    scale_factor,
                    add_offset,
                    fill,
                } => {
                    let mut var = file.add_variable::<i16>(name, &dims)?;
                    if let Some(units) = self.units_of(name) {
                        var.put_attribute("units", units)?;
                    }
                    var.put_attribute("_FillValue", *fill)?;
                    var.put_attribute("scale_factor", *scale_factor)?;
                    var.put_attribute("add_offset", *add_offset)?;
                    var.put_values(raw, ..)?;
                }
            }
        }

        Ok(path.to_path_buf())
    }
}

/// Quantize physical values into `i16` with the given packing.
///
/// `None` entries become `fill`.
pub fn pack_i16(
    values: &[Option<f64>],
    scale_factor: f64,
    add_offset: f64,
    fill: i16,
) -> Vec<i16> {
    values
        .iter()
        .map(|v| match v {
            Some(v) => ((v - add_offset) / scale_factor).round() as i16,
            None => fill,
        })
        .collect()
}
