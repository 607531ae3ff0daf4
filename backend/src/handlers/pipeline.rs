//! HTTP handlers for pipeline endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use shared::{ClassifiedRecord, DerivedRecord};

use crate::error::AppResult;
use crate::services::pipeline::{ImportOptions, ObservationBatch, PipelineRun, PipelineService};
use crate::AppState;

/// Derive time-series features for a batch of observations
pub async fn derive_series(
    State(state): State<AppState>,
    Json(batch): Json<ObservationBatch>,
) -> AppResult<Json<PipelineRun<DerivedRecord>>> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let run = service.derive(batch)?;
    Ok(Json(run))
}

/// Derive and classify a batch of observations
pub async fn run_pipeline(
    State(state): State<AppState>,
    Json(batch): Json<ObservationBatch>,
) -> AppResult<Json<PipelineRun<ClassifiedRecord>>> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let run = service.run(batch)?;
    Ok(Json(run))
}

/// Run the pipeline over an uploaded observation CSV
pub async fn import_csv(
    State(state): State<AppState>,
    Query(options): Query<ImportOptions>,
    body: String,
) -> AppResult<Json<PipelineRun<ClassifiedRecord>>> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let run = service.import_csv(&body, options)?;
    Ok(Json(run))
}
