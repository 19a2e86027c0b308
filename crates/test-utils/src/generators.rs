//! Test data generators for creating synthetic ERA5-like fields.
//!
//! All grids are row-major with latitude rows stored first, matching the
//! `(latitude, longitude)` layout of archive downloads.

/// Evenly spaced labels from `start` to `end` inclusive.
///
/// Labels are computed from the index rather than accumulated so that 0.25
/// degree grids land exactly on quarter degrees.
pub fn axis_labels(start: f64, end: f64, step: f64) -> Vec<f64> {
    let count = ((end - start).abs() / step).round() as usize + 1;
    let sign = if end < start { -1.0 } else { 1.0 };
    (0..count).map(|i| start + sign * step * i as f64).collect()
}

/// Creates a test grid with predictable values.
///
/// Each cell value is `col * 1000 + row`, so a read at (row, col) can be
/// checked against the indices it came from.
///
/// # Example
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);  // col=1, row=0
/// assert_eq!(grid[10], 1.0);    // col=0, row=1
/// ```
pub fn create_index_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a 2 m temperature grid in Kelvin.
///
/// Values run from about 250 K in the first row (north) to 310 K in the last
/// row (south), with a small west-east gradient.
pub fn create_temperature_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            data.push(250.0 + x_factor * 10.0 + y_factor * 50.0);
        }
    }
    data
}

/// Creates a dew point grid a fixed `depression` (K) below `temperature`.
pub fn create_dewpoint_grid(temperature: &[f32], depression: f32) -> Vec<f32> {
    temperature.iter().map(|t| t - depression).collect()
}

/// Creates a U-component wind grid (west-east component) in m/s.
///
/// U varies by latitude row from -20 to +20 m/s.
pub fn create_u_wind_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        let lat_factor = (row as f32 / height.max(1) as f32 - 0.5) * 2.0;
        data.extend(std::iter::repeat(lat_factor * 20.0).take(width));
    }
    data
}

/// Creates a V-component wind grid (south-north component) in m/s.
///
/// V varies by longitude column from -15 to +15 m/s.
pub fn create_v_wind_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            let lon_factor = (col as f32 / width.max(1) as f32 - 0.5) * 2.0;
            data.push(lon_factor * 15.0);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Overwrites the given (col, row) cells with `fill`.
pub fn with_fill_at(
    mut data: Vec<f32>,
    width: usize,
    cells: &[(usize, usize)],
    fill: f32,
) -> Vec<f32> {
    for &(col, row) in cells {
        if col >= width {
            continue;
        }
        if let Some(v) = data.get_mut(row * width + col) {
            *v = fill;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_labels() {
        let lats = axis_labels(90.0, -90.0, 0.25);
        assert_eq!(lats.len(), 721);
        assert_eq!(lats[0], 90.0);
        assert_eq!(lats[360], 0.0);
        assert_eq!(lats[720], -90.0);

        let lons = axis_labels(0.0, 359.75, 0.25);
        assert_eq!(lons.len(), 1440);
        assert_eq!(lons[1439], 359.75);
    }

    #[test]
    fn test_create_index_grid() {
        let grid = create_index_grid(10, 5);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[11], 1001.0);
    }

    #[test]
    fn test_create_temperature_grid() {
        let grid = create_temperature_grid(100, 100);
        let min = grid.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = grid.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(min >= 250.0);
        assert!(max <= 310.0);
        // South is warmer than north
        assert!(grid[99 * 100] > grid[0]);
    }

    #[test]
    fn test_create_dewpoint_grid() {
        let t = create_temperature_grid(4, 4);
        let td = create_dewpoint_grid(&t, 5.0);
        assert!(t.iter().zip(&td).all(|(t, td)| (t - td - 5.0).abs() < 1e-4));
    }

    #[test]
    fn test_wind_components() {
        let u = create_u_wind_grid(10, 10);
        let v = create_v_wind_grid(10, 10);
        assert_eq!(u[0], -20.0);
        assert_eq!(v[0], -15.0);
        // U is constant along a row, V along a column
        assert_eq!(u[0], u[9]);
        assert_eq!(v[0], v[90]);
    }

    #[test]
    fn test_with_fill_at() {
        let grid = with_fill_at(create_constant_grid(10, 10, 1.0), 10, &[(5, 5), (20, 0)], -9.0);
        assert_eq!(grid[55], -9.0);
        assert_eq!(grid.iter().filter(|&&v| v == -9.0).count(), 1);
    }
}
