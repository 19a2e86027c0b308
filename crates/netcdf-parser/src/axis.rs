//! Coordinate axes and nearest-label lookup.
//!
//! Each axis is resolved independently: the nearest latitude and the nearest
//! longitude are found separately, never by a combined distance.
//!
//! When the target lies exactly halfway between two labels the lower storage
//! index wins. Binary and linear search follow the same rule so the result
//! does not depend on whether the axis happens to be sorted.

use std::fmt;

/// Ordering of the labels along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// Strictly increasing (also used for single-label axes)
    Ascending,
    /// Strictly decreasing, e.g. ERA5 latitudes from 90 to -90
    Descending,
    /// Anything else, including axes containing NaN
    Unordered,
}

impl AxisOrder {
    /// Detect the ordering of `values`.
    pub fn detect(values: &[f64]) -> Self {
        if values.iter().any(|v| v.is_nan()) {
            return AxisOrder::Unordered;
        }
        if values.windows(2).all(|w| w[0] < w[1]) {
            AxisOrder::Ascending
        } else if values.windows(2).all(|w| w[0] > w[1]) {
            AxisOrder::Descending
        } else {
            AxisOrder::Unordered
        }
    }
}

/// Longitude labelling of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeConvention {
    /// Longitudes in -180..180
    Signed,
    /// Longitudes in 0..360
    ZeroTo360,
}

impl LongitudeConvention {
    /// Infer the convention from a longitude axis.
    ///
    /// Any label above 180 means 0..360, anything else is treated as signed.
    pub fn detect(values: &[f64]) -> Self {
        if values.iter().any(|&v| v > 180.0) {
            LongitudeConvention::ZeroTo360
        } else {
            LongitudeConvention::Signed
        }
    }

    /// Whether `longitude` is written in a different convention than this one.
    ///
    /// Only unambiguous cases are reported: a negative value against a 0..360
    /// grid, or a value above 180 against a signed grid.
    pub fn mismatches(&self, longitude: f64) -> bool {
        match self {
            LongitudeConvention::ZeroTo360 => longitude < 0.0,
            LongitudeConvention::Signed => longitude > 180.0,
        }
    }
}

impl fmt::Display for LongitudeConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LongitudeConvention::Signed => f.write_str("-180..180"),
            LongitudeConvention::ZeroTo360 => f.write_str("0..360"),
        }
    }
}

/// A named one-dimensional coordinate variable.
#[derive(Debug, Clone)]
pub struct CoordinateAxis {
    name: String,
    values: Vec<f64>,
    order: AxisOrder,
}

impl CoordinateAxis {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let order = AxisOrder::detect(&values);
        Self {
            name: name.into(),
            values,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn order(&self) -> AxisOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Label at `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Index of the label closest to `target`.
    ///
    /// Returns `None` for an empty axis or a non-finite target.
    pub fn nearest(&self, target: f64) -> Option<usize> {
        if !target.is_finite() || self.values.is_empty() {
            return None;
        }
        match self.order {
            AxisOrder::Ascending => {
                let split = self.values.partition_point(|&v| v < target);
                Some(self.closer_of(split, target))
            }
            AxisOrder::Descending => {
                let split = self.values.partition_point(|&v| v > target);
                Some(self.closer_of(split, target))
            }
            AxisOrder::Unordered => nearest_index(&self.values, target),
        }
    }

    /// Pick between the labels either side of a binary-search split point.
    fn closer_of(&self, split: usize, target: f64) -> usize {
        if split == 0 {
            return 0;
        }
        if split == self.values.len() {
            return split - 1;
        }
        let before = (self.values[split - 1] - target).abs();
        let after = (self.values[split] - target).abs();
        if after < before {
            split
        } else {
            split - 1
        }
    }
}

/// Index of the value closest to `target` by linear scan.
///
/// Works on unsorted input. NaN entries are skipped; the first of several
/// equally close values is returned.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        let dist = (v - target).abs();
        if dist.is_nan() {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn era5_latitudes() -> Vec<f64> {
        (0..=720).map(|i| 90.0 - i as f64 * 0.25).collect()
    }

    fn era5_longitudes() -> Vec<f64> {
        (0..1440).map(|i| i as f64 * 0.25).collect()
    }

    #[test]
    fn test_detect_order() {
        assert_eq!(AxisOrder::detect(&[1.0, 2.0, 3.0]), AxisOrder::Ascending);
        assert_eq!(AxisOrder::detect(&[3.0, 2.0, 1.0]), AxisOrder::Descending);
        assert_eq!(AxisOrder::detect(&[1.0, 3.0, 2.0]), AxisOrder::Unordered);
        assert_eq!(AxisOrder::detect(&[1.0, 1.0]), AxisOrder::Unordered);
        assert_eq!(AxisOrder::detect(&[5.0]), AxisOrder::Ascending);
        assert_eq!(AxisOrder::detect(&[1.0, f64::NAN]), AxisOrder::Unordered);
    }

    #[test]
    fn test_nearest_descending_latitudes() {
        let axis = CoordinateAxis::new("latitude", era5_latitudes());
        assert_eq!(axis.order(), AxisOrder::Descending);
        assert_eq!(axis.nearest(90.0), Some(0));
        assert_eq!(axis.nearest(-90.0), Some(720));
        assert_eq!(axis.get(axis.nearest(52.52).unwrap()), Some(52.5));
        assert_eq!(axis.get(axis.nearest(40.1).unwrap()), Some(40.0));
        assert_eq!(axis.get(axis.nearest(-33.87).unwrap()), Some(-33.75));
    }

    #[test]
    fn test_nearest_ascending_longitudes() {
        let axis = CoordinateAxis::new("longitude", era5_longitudes());
        assert_eq!(axis.order(), AxisOrder::Ascending);
        assert_eq!(axis.get(axis.nearest(13.41).unwrap()), Some(13.5));
        assert_eq!(axis.get(axis.nearest(285.0).unwrap()), Some(285.0));
    }

    #[test]
    fn test_nearest_clamps_outside_extent() {
        let axis = CoordinateAxis::new("longitude", era5_longitudes());
        assert_eq!(axis.nearest(-75.0), Some(0));
        assert_eq!(axis.nearest(400.0), Some(1439));

        let lat = CoordinateAxis::new("latitude", era5_latitudes());
        assert_eq!(lat.nearest(95.0), Some(0));
        assert_eq!(lat.nearest(-95.0), Some(720));
    }

    #[test]
    fn test_midpoint_resolves_to_lower_index() {
        let asc = CoordinateAxis::new("x", vec![0.0, 1.0, 2.0]);
        assert_eq!(asc.nearest(0.5), Some(0));

        let desc = CoordinateAxis::new("y", vec![2.0, 1.0, 0.0]);
        assert_eq!(desc.nearest(1.5), Some(0));

        assert_eq!(nearest_index(&[0.0, 1.0, 2.0], 1.5), Some(1));
    }

    #[test]
    fn test_binary_and_linear_search_agree() {
        let lat = CoordinateAxis::new("latitude", era5_latitudes());
        let lon = CoordinateAxis::new("longitude", era5_longitudes());
        let mut q = -95.0;
        while q <= 365.0 {
            assert_eq!(lat.nearest(q), nearest_index(lat.values(), q), "lat {}", q);
            assert_eq!(lon.nearest(q), nearest_index(lon.values(), q), "lon {}", q);
            q += 0.0625;
        }
    }

    #[test]
    fn test_unordered_axis_uses_linear_scan() {
        let axis = CoordinateAxis::new("x", vec![10.0, -5.0, 3.0, 7.0]);
        assert_eq!(axis.order(), AxisOrder::Unordered);
        assert_eq!(axis.nearest(4.0), Some(2));
        assert_eq!(axis.nearest(-100.0), Some(1));
    }

    #[test]
    fn test_nearest_rejects_empty_and_non_finite() {
        let empty = CoordinateAxis::new("x", Vec::new());
        assert_eq!(empty.nearest(1.0), None);
        assert_eq!(nearest_index(&[], 1.0), None);

        let axis = CoordinateAxis::new("x", vec![1.0, 2.0]);
        assert_eq!(axis.nearest(f64::NAN), None);
        assert_eq!(axis.nearest(f64::INFINITY), None);
    }

    #[test]
    fn test_nearest_index_skips_nan() {
        assert_eq!(nearest_index(&[f64::NAN, 4.0, 9.0], 0.0), Some(1));
        assert_eq!(nearest_index(&[f64::NAN], 0.0), None);
    }

    #[test]
    fn test_longitude_convention() {
        assert_eq!(
            LongitudeConvention::detect(&era5_longitudes()),
            LongitudeConvention::ZeroTo360
        );
        assert_eq!(
            LongitudeConvention::detect(&[-180.0, 0.0, 179.75]),
            LongitudeConvention::Signed
        );
        assert!(LongitudeConvention::ZeroTo360.mismatches(-75.0));
        assert!(!LongitudeConvention::ZeroTo360.mismatches(285.0));
        assert!(LongitudeConvention::Signed.mismatches(285.0));
        assert!(!LongitudeConvention::Signed.mismatches(-75.0));
    }
}
