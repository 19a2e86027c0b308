//! Common types and utilities shared by the ERA5 retriever and extractor.

pub mod error;
pub mod json;
pub mod meteo;
pub mod point;
pub mod request;
pub mod variables;
pub mod weather;

pub use error::{Era5Error, Era5Result};
pub use point::QueryPoint;
pub use request::{DataFormat, RetrievalRequest};
pub use variables::Era5Variable;
pub use weather::{PointSample, WeatherResult};
