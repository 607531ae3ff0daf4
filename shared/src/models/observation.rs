//! Environmental observation models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// A single validated reading for one region on one day.
///
/// Soil moisture is always a fraction here; percent readings are converted
/// when a [`RawObservation`] is validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub timestamp: NaiveDate,
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// NDVI
    pub vegetation_index: f64,
    /// EVI
    pub secondary_index: f64,
    pub soil_moisture: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Millimetres
    pub precipitation: f64,
    pub region_label: String,
}

impl Observation {
    pub fn location(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}

/// Observation as received over the wire or from a CSV file.
///
/// Every field is optional so that a missing value is reported by name
/// instead of failing the whole payload at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub timestamp: Option<NaiveDate>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub vegetation_index: Option<f64>,
    pub secondary_index: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub region_label: Option<String>,
}

impl From<Observation> for RawObservation {
    fn from(obs: Observation) -> Self {
        Self {
            timestamp: Some(obs.timestamp),
            latitude: Some(obs.latitude),
            longitude: Some(obs.longitude),
            vegetation_index: Some(obs.vegetation_index),
            secondary_index: Some(obs.secondary_index),
            soil_moisture: Some(obs.soil_moisture),
            temperature: Some(obs.temperature),
            precipitation: Some(obs.precipitation),
            region_label: Some(obs.region_label),
        }
    }
}
