//! NetCDF reader for gridded reanalysis data.
//!
//! This crate opens NetCDF-4 files laid out on a regular latitude/longitude
//! grid (as delivered by the ERA5 archive) and reads single grid cells by
//! nearest-neighbour lookup.
//!
//! # Data Layout
//!
//! Coordinates are found under `latitude`/`lat` and `longitude`/`lon`. Data
//! variables may carry extra length-1 dimensions such as `valid_time`, which
//! are reduced away. Packed variables (`scale_factor`, `add_offset`) are
//! unpacked and `_FillValue`/`missing_value` cells are reported as missing.
//!
//! # Example
//!
//! ```ignore
//! use netcdf_parser::GriddedDataset;
//!
//! let ds = GriddedDataset::open("output.nc")?;
//! let cell = ds.nearest_cell(40.0, 285.0)?;
//! let t2m = ds.value_at("t2m", &cell)?;
//! ```

pub mod axis;
pub mod dataset;
pub mod error;
pub mod native;

pub use axis::{nearest_index, AxisOrder, CoordinateAxis, LongitudeConvention};
pub use dataset::{GridCell, GriddedDataset};
pub use error::{NetCdfError, NetCdfResult};
