//! Common test fixtures for ERA5 point extraction tests.

/// Query locations used across the test suite, as (latitude, longitude).
pub mod points {
    /// New York with a signed longitude
    pub const NEW_YORK: (f64, f64) = (40.7128, -74.006);

    /// New York with the longitude in 0..360
    pub const NEW_YORK_EAST: (f64, f64) = (40.7128, 285.994);

    /// Berlin
    pub const BERLIN: (f64, f64) = (52.52, 13.405);

    /// Sydney
    pub const SYDNEY: (f64, f64) = (-33.8688, 151.2093);

    /// North pole
    pub const NORTH_POLE: (f64, f64) = (90.0, 0.0);
}

/// Raw ERA5 values with known derived results.
pub mod samples {
    /// A warm humid afternoon: 26.85 °C, 3/4/5 wind, dew point 10 K lower.
    ///
    /// Prints as `{"temperature": 26.9, "wind_speed": 5.0, "humidity": 54.3}`.
    pub const WARM: Sample = Sample {
        t2m: 300.0,
        u10: 3.0,
        v10: 4.0,
        d2m: 290.0,
    };

    /// Saturated air with no wind.
    pub const SATURATED_CALM: Sample = Sample {
        t2m: 283.15,
        u10: 0.0,
        v10: 0.0,
        d2m: 283.15,
    };

    /// The four ERA5 single-level fields at one grid cell.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Sample {
        pub t2m: f32,
        pub u10: f32,
        pub v10: f32,
        pub d2m: f32,
    }
}

/// Common grid specifications for testing.
pub mod grid {
    /// ERA5 single-levels global grid (0.25 degree resolution)
    pub const ERA5_GLOBAL: GridSpec = GridSpec {
        resolution: 0.25,
        north: 90.0,
        south: -90.0,
        west: 0.0,
        east: 359.75,
    };

    /// Coarse 5-degree global grid, labelled 0..360
    pub const GLOBAL_5DEG: GridSpec = GridSpec {
        resolution: 5.0,
        north: 90.0,
        south: -90.0,
        west: 0.0,
        east: 355.0,
    };

    /// Small 1-degree grid over the eastern US, labelled 0..360
    pub const EAST_US_1DEG: GridSpec = GridSpec {
        resolution: 1.0,
        north: 45.0,
        south: 35.0,
        west: 280.0,
        east: 290.0,
    };

    /// Small 0.5-degree grid over central Europe, labelled -180..180
    pub const EUROPE_HALF_DEG: GridSpec = GridSpec {
        resolution: 0.5,
        north: 55.0,
        south: 50.0,
        west: 10.0,
        east: 15.0,
    };

    /// Regular lat/lon grid with latitudes stored north to south.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub resolution: f64,
        pub north: f64,
        pub south: f64,
        pub west: f64,
        pub east: f64,
    }

    impl GridSpec {
        /// Latitude labels from north to south.
        pub fn latitudes(&self) -> Vec<f64> {
            crate::generators::axis_labels(self.north, self.south, self.resolution)
        }

        /// Longitude labels from west to east.
        pub fn longitudes(&self) -> Vec<f64> {
            crate::generators::axis_labels(self.west, self.east, self.resolution)
        }

        /// Returns (rows, columns).
        pub fn shape(&self) -> (usize, usize) {
            (self.latitudes().len(), self.longitudes().len())
        }
    }
}
