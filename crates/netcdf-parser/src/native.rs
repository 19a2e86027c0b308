//! Low-level helpers over the native netcdf library.
//!
//! Variable reads are widened to `f64` and CF packing attributes
//! (`scale_factor`, `add_offset`, `_FillValue`, `missing_value`) are applied
//! here, so callers only ever see physical values.

use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// Turn off the HDF5 library's automatic error printing.
///
/// Probing for optional attributes such as `_FillValue` otherwise prints
/// `HDF5-DIAG` traces to stderr even though the miss is handled. Safe to call
/// repeatedly; only the first call has an effect.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: null handler and client data disable printing for the
        // default error stack.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// CF packing and missing-data attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    /// Read the packing attributes of `var`; absent attributes keep defaults.
    pub fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
            fill_value: get_f64_attr(var, "_FillValue"),
            missing_value: get_f64_attr(var, "missing_value"),
        }
    }

    /// Convert a stored value to its physical value.
    ///
    /// Returns `None` for NaN and for the fill/missing sentinels, which are
    /// compared before scaling.
    pub fn unpack(&self, raw: f64) -> Option<f64> {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return None;
        }
        Some(raw * self.scale_factor + self.add_offset)
    }
}

/// Read every value of `var` widened to `f64`, in row-major order.
///
/// The library converts between numeric types on read for most builds; when
/// it refuses, the storage types found in reanalysis files are tried in turn.
pub fn read_f64_values(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    let first_err = match var.get_values::<f64, _>(..) {
        Ok(values) => return Ok(values),
        Err(e) => e,
    };
    if let Ok(values) = var.get_values::<f32, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i32, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i16, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    Err(NetCdfError::InvalidFormat(format!(
        "Failed to read variable '{}' as numeric data: {}",
        var.name(),
        first_err
    )))
}

/// Read the single element of `var` at `indices`, widened to `f64`.
///
/// `indices` holds one entry per dimension of `var`.
pub fn read_f64_value(var: &netcdf::Variable, indices: &[usize]) -> NetCdfResult<f64> {
    let first_err = match var.get_value::<f64, _>(indices) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    if let Ok(value) = var.get_value::<f32, _>(indices) {
        return Ok(f64::from(value));
    }
    if let Ok(value) = var.get_value::<i32, _>(indices) {
        return Ok(f64::from(value));
    }
    if let Ok(value) = var.get_value::<i16, _>(indices) {
        return Ok(f64::from(value));
    }
    Err(NetCdfError::InvalidFormat(format!(
        "Failed to read '{}' at {:?}: {}",
        var.name(),
        indices,
        first_err
    )))
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric attribute value widened to `f64`.
pub fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    if let Ok(v) = f64::try_from(attr_value.clone()) {
        return Some(v);
    }
    if let Ok(v) = f32::try_from(attr_value.clone()) {
        return Some(f64::from(v));
    }
    if let Ok(v) = i32::try_from(attr_value.clone()) {
        return Some(f64::from(v));
    }
    i16::try_from(attr_value).ok().map(f64::from)
}

/// String attribute value.
pub fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_identity() {
        let packing = Packing::default();
        assert_eq!(packing.unpack(291.5), Some(291.5));
    }

    #[test]
    fn test_unpack_scale_and_offset() {
        let packing = Packing {
            scale_factor: 0.01,
            add_offset: 250.0,
            ..Default::default()
        };
        let value = packing.unpack(4000.0).unwrap();
        assert!((value - 290.0).abs() < 1e-9);
    }

    #[test]
    fn test_unpack_sentinels() {
        let packing = Packing {
            fill_value: Some(-32767.0),
            missing_value: Some(-9999.0),
            ..Default::default()
        };
        assert_eq!(packing.unpack(-32767.0), None);
        assert_eq!(packing.unpack(-9999.0), None);
        assert_eq!(packing.unpack(f64::NAN), None);
        assert_eq!(packing.unpack(0.0), Some(0.0));
    }
}
