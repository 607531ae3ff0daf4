//! Domain models for the BloomWatch analytics pipeline

mod labels;
mod observation;
mod record;
mod report;

pub use labels::*;
pub use observation::*;
pub use record::*;
pub use report::*;

/// NDVI/EVI nominal range
pub const INDEX_RANGE: (f64, f64) = (-1.0, 1.0);

/// Soil moisture range once normalized to a fraction
pub const SOIL_MOISTURE_RANGE: (f64, f64) = (0.0, 1.0);

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);
