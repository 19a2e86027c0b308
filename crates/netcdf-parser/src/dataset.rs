//! Read-only access to a gridded NetCDF file on a latitude/longitude grid.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::axis::{CoordinateAxis, LongitudeConvention};
use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{
    get_str_attr, read_f64_value, read_f64_values, silence_hdf5_errors, Packing,
};

/// Coordinate variable names tried for the latitude axis, in order.
pub const LATITUDE_NAMES: [&str; 2] = ["latitude", "lat"];

/// Coordinate variable names tried for the longitude axis, in order.
pub const LONGITUDE_NAMES: [&str; 2] = ["longitude", "lon"];

/// The grid cell selected for a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub lat_index: usize,
    pub lon_index: usize,
    /// Latitude label of the selected row
    pub latitude: f64,
    /// Longitude label of the selected column
    pub longitude: f64,
}

/// A NetCDF file opened for point reads.
///
/// The coordinate axes are loaded once at open time; variable data is read on
/// demand.
pub struct GriddedDataset {
    path: PathBuf,
    file: netcdf::File,
    latitude: CoordinateAxis,
    longitude: CoordinateAxis,
    lat_dim: String,
    lon_dim: String,
}

impl std::fmt::Debug for GriddedDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GriddedDataset")
            .field("path", &self.path)
            .field("latitude", &self.latitude.len())
            .field("longitude", &self.longitude.len())
            .finish()
    }
}

impl GriddedDataset {
    /// Open `path` and load its latitude and longitude axes.
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        // Silence HDF5's verbose stderr output for missing attributes
        silence_hdf5_errors();

        let path = path.as_ref();
        if !path.exists() {
            return Err(NetCdfError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file", path.display()),
            )));
        }

        let file = netcdf::open(path).map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to open NetCDF {}: {}", path.display(), e))
        })?;

        let (latitude, lat_dim) = read_axis(&file, &LATITUDE_NAMES)?;
        let (longitude, lon_dim) = read_axis(&file, &LONGITUDE_NAMES)?;

        debug!(
            path = %path.display(),
            lat_points = latitude.len(),
            lon_points = longitude.len(),
            lat_order = ?latitude.order(),
            lon_order = ?longitude.order(),
            "Opened gridded dataset"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            latitude,
            longitude,
            lat_dim,
            lon_dim,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn latitude(&self) -> &CoordinateAxis {
        &self.latitude
    }

    pub fn longitude(&self) -> &CoordinateAxis {
        &self.longitude
    }

    /// Longitude convention of the grid.
    pub fn longitude_convention(&self) -> LongitudeConvention {
        LongitudeConvention::detect(self.longitude.values())
    }

    /// Names of all variables in the file.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// The `units` attribute of `variable`, if it has one.
    pub fn units(&self, variable: &str) -> Option<String> {
        let var = self.file.variable(variable)?;
        get_str_attr(&var, "units")
    }

    /// Fail unless every name in `names` is a variable of the file.
    ///
    /// The error lists all absent names, not just the first.
    pub fn require_variables(&self, names: &[&str]) -> NetCdfResult<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.has_variable(name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(NetCdfError::MissingData(format!(
                "variable(s) {} not found in {}",
                missing.join(", "),
                self.path.display()
            )))
        }
    }

    /// Resolve the nearest grid cell, one axis at a time.
    pub fn nearest_cell(&self, latitude: f64, longitude: f64) -> NetCdfResult<GridCell> {
        let lat_index = self.latitude.nearest(latitude).ok_or_else(|| {
            NetCdfError::InvalidQuery(format!(
                "cannot match latitude {} against {} grid points",
                latitude,
                self.latitude.len()
            ))
        })?;
        let lon_index = self.longitude.nearest(longitude).ok_or_else(|| {
            NetCdfError::InvalidQuery(format!(
                "cannot match longitude {} against {} grid points",
                longitude,
                self.longitude.len()
            ))
        })?;

        Ok(GridCell {
            lat_index,
            lon_index,
            latitude: self.latitude.values()[lat_index],
            longitude: self.longitude.values()[lon_index],
        })
    }

    /// Physical value of `variable` at `cell`.
    ///
    /// Dimensions other than latitude and longitude must have length 1 (e.g.
    /// a single `valid_time`); they are reduced to their only element.
    pub fn value_at(&self, variable: &str, cell: &GridCell) -> NetCdfResult<f64> {
        let var = self
            .file
            .variable(variable)
            .ok_or_else(|| NetCdfError::MissingData(format!("variable '{}'", variable)))?;

        let mut indices = Vec::with_capacity(var.dimensions().len());
        let mut has_lat = false;
        let mut has_lon = false;

        for dim in var.dimensions() {
            let dim_name = dim.name();
            let len = dim.len();
            let index = if dim_name == self.lat_dim {
                has_lat = true;
                cell.lat_index
            } else if dim_name == self.lon_dim {
                has_lon = true;
                cell.lon_index
            } else if len == 1 {
                0
            } else {
                return Err(NetCdfError::InvalidFormat(format!(
                    "variable '{}' has dimension '{}' of length {}; only length-1 dimensions \
                     besides latitude/longitude can be reduced",
                    variable, dim_name, len
                )));
            };
            if index >= len {
                return Err(NetCdfError::InvalidFormat(format!(
                    "index {} out of range for dimension '{}' ({}) of '{}'",
                    index, dim_name, len, variable
                )));
            }
            indices.push(index);
        }

        if !has_lat || !has_lon {
            return Err(NetCdfError::InvalidFormat(format!(
                "variable '{}' is not defined on the {}/{} grid",
                variable, self.lat_dim, self.lon_dim
            )));
        }

        let raw = read_f64_value(&var, &indices)?;

        Packing::from_variable(&var)
            .unpack(raw)
            .ok_or_else(|| NetCdfError::NoData {
                variable: variable.to_string(),
                latitude: cell.latitude,
                longitude: cell.longitude,
            })
    }

    /// Nearest-neighbour read of a single variable.
    pub fn sel_nearest(&self, variable: &str, latitude: f64, longitude: f64) -> NetCdfResult<f64> {
        let cell = self.nearest_cell(latitude, longitude)?;
        self.value_at(variable, &cell)
    }
}

/// Load the first coordinate variable found under `names`.
///
/// Returns the axis and the name of the dimension it labels.
fn read_axis(file: &netcdf::File, names: &[&str]) -> NetCdfResult<(CoordinateAxis, String)> {
    let var = names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| NetCdfError::MissingData(format!("coordinate {}", names.join(" or "))))?;

    let dims = var.dimensions();
    if dims.len() != 1 {
        return Err(NetCdfError::InvalidFormat(format!(
            "coordinate '{}' must be one-dimensional, found {} dimensions",
            var.name(),
            dims.len()
        )));
    }
    let dim_name = dims[0].name();

    let packing = Packing::from_variable(&var);
    let values: Vec<f64> = read_f64_values(&var)?
        .into_iter()
        .map(|raw| packing.unpack(raw).unwrap_or(f64::NAN))
        .collect();

    Ok((CoordinateAxis::new(var.name(), values), dim_name))
}
