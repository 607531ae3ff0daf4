//! HTTP handlers for single-point classification

use axum::Json;
use shared::{BloomStage, Classification, IntensityAssessment, IntensityFeatures, StageFeatures};

/// Classify the bloom stage of one feature point
pub async fn classify_stage(Json(features): Json<StageFeatures>) -> Json<Classification<BloomStage>> {
    Json(shared::classify_stage(&features))
}

/// Score and classify the bloom intensity of one feature point
pub async fn classify_intensity(Json(features): Json<IntensityFeatures>) -> Json<IntensityAssessment> {
    Json(shared::classify_intensity(&features))
}
