//! Route definitions for the BloomWatch analytics API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/pipeline", pipeline_routes())
        .nest("/classify", classify_routes())
        .route("/forecast", post(handlers::forecast_bloom))
        .nest("/reports", report_routes())
        .route("/export/csv", post(handlers::export_csv))
        .route("/import/csv", post(handlers::import_csv))
}

/// Derivation and full pipeline runs
fn pipeline_routes() -> Router<AppState> {
    Router::new()
        .route("/derive", post(handlers::derive_series))
        .route("/run", post(handlers::run_pipeline))
}

/// Single-point classifiers
fn classify_routes() -> Router<AppState> {
    Router::new()
        .route("/stage", post(handlers::classify_stage))
        .route("/intensity", post(handlers::classify_intensity))
}

/// Dashboard aggregates
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-intensity", post(handlers::get_monthly_intensity))
        .route("/regions", post(handlers::get_region_summaries))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{create_app, Config, AppState};

    fn app() -> axum::Router {
        create_app(AppState {
            config: Arc::new(Config::default()),
        })
    }

    fn observation(date: &str, region: &str, ndvi: f64) -> Value {
        json!({
            "timestamp": date,
            "latitude": "-1.29",
            "longitude": "36.82",
            "vegetationIndex": ndvi,
            "secondaryIndex": ndvi * 0.8,
            "soilMoisture": 0.3,
            "temperature": 24.0,
            "precipitation": 3.5,
            "regionLabel": region,
        })
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_run_pipeline() {
        let (status, body) = post_json(
            "/api/v1/pipeline/run",
            json!({
                "observations": [
                    observation("2024-01-15", "Nairobi", 0.35),
                    observation("2024-01-01", "Nairobi", 0.25),
                    observation("2024-01-08", "Mombasa", 0.65),
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["runId"].is_string());

        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["regionLabel"], "Nairobi");
        assert_eq!(records[0]["timestamp"], "2024-01-01");
        assert_eq!(records[0]["stageLabel"], "Pre-bloom");
        assert_eq!(records[2]["regionLabel"], "Mombasa");
    }

    #[tokio::test]
    async fn test_missing_field_is_unprocessable() {
        let mut obs = observation("2024-01-01", "Nairobi", 0.4);
        obs.as_object_mut().unwrap().remove("temperature");

        let (status, body) = post_json("/api/v1/pipeline/derive", json!({ "observations": [obs] })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "temperature");
    }

    #[tokio::test]
    async fn test_classify_stage() {
        let (status, body) = post_json(
            "/api/v1/classify/stage",
            json!({
                "vegetationIndex": 0.65,
                "slope": 0.0,
                "soilMoisture": 0.3,
                "temperature": 22.0
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "Peak");
        assert_eq!(body["confidence"], 0.88);
    }

    #[tokio::test]
    async fn test_classify_intensity() {
        let (status, body) = post_json(
            "/api/v1/classify/intensity",
            json!({ "vegetationIndex": 0.2, "secondaryIndex": 0.2, "soilMoisture": 0.0 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "Mild");
    }

    #[tokio::test]
    async fn test_forecast_without_history() {
        let (status, body) = post_json(
            "/api/v1/forecast",
            json!({ "observations": [], "region": "Kisumu", "daysAhead": 14 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stageLabel"], "Pre-bloom");
        assert_eq!(body["intensityLabel"], "Mild");
        assert_eq!(body["confidence"], 0.5);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/export/csv")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "observations": [observation("2024-01-01", "Nairobi", 0.4)] })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with("date,lat,lon,ndvi,evi,soilMoisture"));
        assert_eq!(csv.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_import_csv() {
        let data = "date,lat,lon,ndvi,evi,soilMoisture,temperature,precipitation,region\n\
                    2024-01-01,-1.29,36.82,0.62,0.5,30,23.0,1.0,Nairobi\n";

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/import/csv?soilMoistureUnit=percent")
                    .header(header::CONTENT_TYPE, "text/csv")
                    .body(Body::from(data))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["records"][0]["soilMoisture"], 0.3);
        assert_eq!(body["records"][0]["stageLabel"], "Peak");
    }

    #[tokio::test]
    async fn test_import_malformed_csv_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/import/csv")
                    .body(Body::from("date,ndvi\nyesterday,lots\n"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
