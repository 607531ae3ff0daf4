//! Reporting handlers for dashboard aggregates

use axum::{extract::State, Json};
use shared::{MonthlyIntensity, RegionSummary};

use crate::error::AppResult;
use crate::services::pipeline::{ObservationBatch, PipelineService};
use crate::AppState;

/// Get monthly bloom intensity per region
pub async fn get_monthly_intensity(
    State(state): State<AppState>,
    Json(batch): Json<ObservationBatch>,
) -> AppResult<Json<Vec<MonthlyIntensity>>> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let report = service.monthly_intensity(batch)?;
    Ok(Json(report))
}

/// Get per-region summaries
pub async fn get_region_summaries(
    State(state): State<AppState>,
    Json(batch): Json<ObservationBatch>,
) -> AppResult<Json<Vec<RegionSummary>>> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let summaries = service.region_summaries(batch)?;
    Ok(Json(summaries))
}
