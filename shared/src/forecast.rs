//! Short-range bloom forecast by linear extrapolation

use chrono::{Days, NaiveDate, Utc};

use crate::classify::{classify_intensity, classify_stage, IntensityFeatures, StageFeatures};
use crate::error::ValidationError;
use crate::models::{BloomForecast, BloomIntensity, BloomStage, DerivedRecord};
use crate::stats::mean;

/// Number of most recent records the projection averages over
pub const DEFAULT_FORECAST_WINDOW: usize = 4;

/// Confidence reported when a region has no history
pub const NO_HISTORY_CONFIDENCE: f64 = 0.5;

/// Furthest horizon the servers and bindings accept by default
pub const MAX_FORECAST_DAYS: u32 = 365;

/// Forecast `days_ahead` days past `today` from a region's recent history.
pub fn forecast_bloom(
    history: &[DerivedRecord],
    region: &str,
    days_ahead: u32,
    today: NaiveDate,
) -> Result<BloomForecast, ValidationError> {
    forecast_bloom_with_window(history, region, days_ahead, today, DEFAULT_FORECAST_WINDOW)
}

/// Same as [`forecast_bloom`], dated from the current UTC day.
pub fn forecast_bloom_from_today(
    history: &[DerivedRecord],
    region: &str,
    days_ahead: u32,
) -> Result<BloomForecast, ValidationError> {
    forecast_bloom(history, region, days_ahead, Utc::now().date_naive())
}

/// Average NDVI and slope over the last `window` records of `region`, move
/// NDVI along the mean weekly slope, and classify the projected point.
///
/// `history` may hold several regions in any order. A region with no records
/// gets a low-confidence Pre-bloom/Mild default. Fails only when the
/// forecast date falls outside the calendar chrono can represent.
pub fn forecast_bloom_with_window(
    history: &[DerivedRecord],
    region: &str,
    days_ahead: u32,
    today: NaiveDate,
    window: usize,
) -> Result<BloomForecast, ValidationError> {
    let forecast_date = today
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .ok_or(ValidationError::ForecastHorizon { days_ahead })?;

    let mut recent: Vec<&DerivedRecord> = history
        .iter()
        .filter(|r| r.region_label() == region)
        .collect();
    recent.sort_by_key(|r| r.timestamp());
    let recent = &recent[recent.len().saturating_sub(window.max(1))..];

    if recent.is_empty() {
        return Ok(BloomForecast {
            region_label: region.to_string(),
            forecast_date,
            days_ahead,
            projected_index: None,
            stage_label: BloomStage::PreBloom,
            intensity_label: BloomIntensity::Mild,
            confidence: NO_HISTORY_CONFIDENCE,
            basis_points: 0,
        });
    }

    let avg = |f: fn(&DerivedRecord) -> f64| mean(&recent.iter().map(|r| f(r)).collect::<Vec<_>>());
    let avg_index = avg(|r| r.observation.vegetation_index);
    let avg_slope = avg(|r| r.slope);
    let avg_secondary = avg(|r| r.observation.secondary_index);
    let avg_soil = avg(|r| r.observation.soil_moisture);
    let avg_temperature = avg(|r| r.observation.temperature);

    let projected_index =
        (avg_index + avg_slope * (f64::from(days_ahead) / 7.0)).clamp(0.0, 1.0);

    let stage = classify_stage(&StageFeatures {
        vegetation_index: projected_index,
        slope: avg_slope,
        soil_moisture: avg_soil,
        temperature: avg_temperature,
    });
    let intensity = classify_intensity(&IntensityFeatures {
        vegetation_index: projected_index,
        secondary_index: avg_secondary,
        soil_moisture: avg_soil,
    });

    Ok(BloomForecast {
        region_label: region.to_string(),
        forecast_date,
        days_ahead,
        projected_index: Some(projected_index),
        stage_label: stage.label,
        intensity_label: intensity.label,
        confidence: stage.confidence,
        basis_points: recent.len(),
    })
}
