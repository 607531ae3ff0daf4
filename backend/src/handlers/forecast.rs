//! HTTP handlers for bloom forecasts

use axum::{extract::State, Json};
use chrono::Utc;
use shared::BloomForecast;

use crate::error::AppResult;
use crate::services::pipeline::{ForecastInput, PipelineService};
use crate::AppState;

/// Forecast a region's bloom state from the submitted history
pub async fn forecast_bloom(
    State(state): State<AppState>,
    Json(input): Json<ForecastInput>,
) -> AppResult<Json<BloomForecast>> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let forecast = service.forecast(input, Utc::now().date_naive())?;
    Ok(Json(forecast))
}
