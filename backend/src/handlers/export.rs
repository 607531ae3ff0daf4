//! Export handlers

use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::error::AppResult;
use crate::services::pipeline::{ObservationBatch, PipelineService};
use crate::AppState;

/// Run the pipeline and download the result as CSV
pub async fn export_csv(
    State(state): State<AppState>,
    Json(batch): Json<ObservationBatch>,
) -> AppResult<impl IntoResponse> {
    let service = PipelineService::new(state.config.pipeline.clone());
    let csv = service.export_csv(batch)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bloom_data.csv\"",
            ),
        ],
        csv,
    ))
}
