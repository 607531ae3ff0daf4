//! Derived and classified pipeline records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::labels::{BloomIntensity, BloomStage, HealthStatus, RiskLevel};
use super::observation::Observation;

/// Observation enriched with time-series features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub observation: Observation,
    /// First difference of NDVI from the previous record of the same region
    pub slope: f64,
    /// Centered rolling mean of NDVI
    pub rolling_average: f64,
    /// Centered rolling mean of EVI
    pub secondary_rolling_average: f64,
    /// Z-score of temperature over the whole region series
    pub temperature_anomaly: f64,
    /// Z-score of precipitation over the whole region series
    pub precipitation_anomaly: f64,
}

impl DerivedRecord {
    pub fn region_label(&self) -> &str {
        &self.observation.region_label
    }

    pub fn timestamp(&self) -> NaiveDate {
        self.observation.timestamp
    }
}

/// Derived record with every classifier's verdict attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub derived: DerivedRecord,
    pub stage_label: BloomStage,
    pub intensity_label: BloomIntensity,
    /// Intensity score scaled to 0-100 for display
    pub intensity_score: f64,
    /// Base confidence of the matched stage rule
    pub confidence: f64,
    pub health_status: HealthStatus,
    pub desertification_risk: RiskLevel,
    pub pollen_risk: RiskLevel,
}

impl ClassifiedRecord {
    pub fn observation(&self) -> &Observation {
        &self.derived.observation
    }

    pub fn region_label(&self) -> &str {
        self.derived.region_label()
    }

    pub fn timestamp(&self) -> NaiveDate {
        self.derived.timestamp()
    }
}
