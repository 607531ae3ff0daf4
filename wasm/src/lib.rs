//! WebAssembly module for the BloomWatch dashboards
//!
//! Provides client-side computation for:
//! - Feature derivation and full classification of observation series
//! - Single-point stage and intensity classification
//! - Bloom forecasts
//! - CSV export
//!
//! Series cross the boundary as JSON arrays of observations; soil moisture is
//! expected as a fraction.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

use shared::{DeriveOptions, IntensityFeatures, StageFeatures, MAX_FORECAST_DAYS};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("bloomwatch-wasm loaded"));
}

/// Derive time-series features. Returns a JSON array of derived records.
#[wasm_bindgen]
pub fn derive_series(observations_json: &str, window: usize) -> Result<String, JsValue> {
    derive_json(observations_json, window).map_err(|e| JsValue::from_str(&e))
}

/// Derive and classify with the default window. Returns a JSON array of
/// classified records.
#[wasm_bindgen]
pub fn run_pipeline(observations_json: &str) -> Result<String, JsValue> {
    pipeline_json(observations_json).map_err(|e| JsValue::from_str(&e))
}

/// Bloom stage label for one point
#[wasm_bindgen]
pub fn classify_bloom_stage(ndvi: f64, slope: f64, soil_moisture: f64, temperature: f64) -> String {
    let classification = shared::classify_stage(&StageFeatures {
        vegetation_index: ndvi,
        slope,
        soil_moisture,
        temperature,
    });
    classification.label.to_string()
}

/// Bloom intensity label for one point
#[wasm_bindgen]
pub fn classify_bloom_intensity(ndvi: f64, evi: f64, soil_moisture: f64) -> String {
    let assessment = shared::classify_intensity(&IntensityFeatures {
        vegetation_index: ndvi,
        secondary_index: evi,
        soil_moisture,
    });
    assessment.label.to_string()
}

/// Raw intensity score (not scaled to 0-100)
#[wasm_bindgen]
pub fn intensity_score(ndvi: f64, evi: f64, soil_moisture: f64) -> f64 {
    shared::intensity_score(&IntensityFeatures {
        vegetation_index: ndvi,
        secondary_index: evi,
        soil_moisture,
    })
}

/// Forecast a region from its history, dated from the browser's current UTC
/// day. Returns a JSON forecast.
#[wasm_bindgen]
pub fn forecast_bloom(observations_json: &str, region: &str, days_ahead: u32) -> Result<String, JsValue> {
    let today = browser_today().ok_or_else(|| JsValue::from_str("Browser clock out of range"))?;
    forecast_json(observations_json, region, days_ahead, today).map_err(|e| JsValue::from_str(&e))
}

/// Classify a series and render the dashboard CSV
#[wasm_bindgen]
pub fn export_csv(observations_json: &str) -> Result<String, JsValue> {
    export_json(observations_json).map_err(|e| JsValue::from_str(&e))
}

fn browser_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_utc_full_year() as i32,
        now.get_utc_month() + 1,
        now.get_utc_date(),
    )
}

fn parse_observations(json: &str) -> Result<Vec<Observation>, String> {
    let raw: Vec<RawObservation> =
        serde_json::from_str(json).map_err(|e| format!("Invalid observations JSON: {}", e))?;
    shared::validate_observations(raw, SoilMoistureUnit::Fraction).map_err(|e| e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn derive_json(json: &str, window: usize) -> Result<String, String> {
    let observations = parse_observations(json)?;
    let derived =
        shared::derive_with(observations, DeriveOptions { window }).map_err(|e| e.to_string())?;
    to_json(&derived)
}

fn classify_json(json: &str) -> Result<Vec<ClassifiedRecord>, String> {
    let observations = parse_observations(json)?;
    shared::run_pipeline(observations, DeriveOptions::default()).map_err(|e| e.to_string())
}

fn pipeline_json(json: &str) -> Result<String, String> {
    to_json(&classify_json(json)?)
}

fn forecast_json(json: &str, region: &str, days_ahead: u32, today: NaiveDate) -> Result<String, String> {
    if days_ahead > MAX_FORECAST_DAYS {
        return Err(format!(
            "Forecast horizon of {} days exceeds the limit of {}",
            days_ahead, MAX_FORECAST_DAYS
        ));
    }
    let observations = parse_observations(json)?;
    let history = shared::derive(observations).map_err(|e| e.to_string())?;
    let forecast =
        shared::forecast_bloom(&history, region, days_ahead, today).map_err(|e| e.to_string())?;
    to_json(&forecast)
}

fn export_json(json: &str) -> Result<String, String> {
    let records = classify_json(json)?;
    shared::export_csv(&records).map_err(|e| e.to_string())
}
