//! Forecast and aggregate report models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::labels::{BloomIntensity, BloomStage};
use crate::types::{DateRange, GpsCoordinates};

/// Projected bloom state for a region some days ahead
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloomForecast {
    pub region_label: String,
    pub forecast_date: NaiveDate,
    pub days_ahead: u32,
    /// Extrapolated NDVI, clamped to [0, 1]. `None` when there was no history.
    pub projected_index: Option<f64>,
    pub stage_label: BloomStage,
    pub intensity_label: BloomIntensity,
    pub confidence: f64,
    /// Number of historical records the projection was based on
    pub basis_points: usize,
}

/// Bloom intensity for one region in one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIntensity {
    pub region_label: String,
    /// First day of the month
    pub month: NaiveDate,
    pub observation_count: usize,
    pub mean_vegetation_index: f64,
    pub mean_secondary_index: f64,
    pub mean_soil_moisture: f64,
    /// Monthly NDVI mean after centered smoothing across months
    pub smoothed_vegetation_index: f64,
    /// Monthly EVI mean after centered smoothing across months
    pub smoothed_secondary_index: f64,
    pub intensity_label: BloomIntensity,
    /// 0-100 display score
    pub intensity_score: f64,
}

/// Per-region overview for dashboard cards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region_label: String,
    pub observation_count: usize,
    pub period: DateRange,
    pub centroid: GpsCoordinates,
    pub mean_vegetation_index: f64,
    pub peak_vegetation_index: f64,
    pub peak_date: NaiveDate,
    pub latest_stage: BloomStage,
    /// Records whose temperature or precipitation z-score exceeds 2 in magnitude
    pub anomaly_count: usize,
}
