//! Nearest-grid-point extraction of the weather summary.

use std::path::Path;

use era5_common::{Era5Variable, PointSample, QueryPoint, WeatherResult};
use netcdf_parser::{GridCell, GriddedDataset};
use tracing::{debug, warn};

use crate::error::ExtractResult;

/// Compute the weather summary at the grid cell nearest to `point`.
///
/// All four variables are checked before anything is read, and all are read
/// from the same cell. The query longitude is used as given; a query written
/// in the other longitude convention is only reported.
pub fn extract_weather(
    dataset: &GriddedDataset,
    point: QueryPoint,
) -> ExtractResult<WeatherResult> {
    let names = Era5Variable::ALL.map(|v| v.short_name());
    dataset.require_variables(&names)?;
    check_units(dataset);

    if !(-90.0..=90.0).contains(&point.latitude) {
        warn!(latitude = point.latitude, "Latitude outside -90..90");
    }
    let convention = dataset.longitude_convention();
    if convention.mismatches(point.longitude) {
        warn!(
            longitude = point.longitude,
            grid = %convention,
            "Query longitude uses a different convention than the grid; it is not converted"
        );
    }

    let cell = dataset.nearest_cell(point.latitude, point.longitude)?;
    debug!(
        query = %point,
        grid_latitude = cell.latitude,
        grid_longitude = cell.longitude,
        lat_index = cell.lat_index,
        lon_index = cell.lon_index,
        "Selected grid cell"
    );

    let sample = read_sample(dataset, &cell)?;
    debug!(?sample, "Read sample");
    Ok(WeatherResult::from_sample(&sample))
}

/// Report variables whose `units` attribute differs from the ERA5 units.
///
/// Returns the names of the mismatching variables.
pub fn check_units(dataset: &GriddedDataset) -> Vec<&'static str> {
    let mut mismatched = Vec::new();
    for variable in Era5Variable::ALL {
        let name = variable.short_name();
        match dataset.units(name) {
            Some(units) if units != variable.units() => {
                warn!(
                    variable = name,
                    units = %units,
                    expected = variable.units(),
                    "Unexpected units; values are used as stored"
                );
                mismatched.push(name);
            }
            Some(_) => {}
            None => debug!(variable = name, "No units attribute"),
        }
    }
    mismatched
}

/// Read the four summary variables at `cell`.
pub fn read_sample(dataset: &GriddedDataset, cell: &GridCell) -> ExtractResult<PointSample> {
    let read = |variable: Era5Variable| dataset.value_at(variable.short_name(), cell);
    Ok(PointSample {
        t2m: read(Era5Variable::Temperature2m)?,
        u10: read(Era5Variable::UWind10m)?,
        v10: read(Era5Variable::VWind10m)?,
        d2m: read(Era5Variable::Dewpoint2m)?,
    })
}

/// Open `path` and extract the summary at `point`.
pub fn extract_from_path(path: &Path, point: QueryPoint) -> ExtractResult<WeatherResult> {
    let dataset = GriddedDataset::open(path)?;
    extract_weather(&dataset, point)
}
