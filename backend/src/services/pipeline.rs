//! Pipeline service: validation, derivation, classification and reports
//! over a batch of observations submitted with the request

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::{
    derive_with, export_csv, forecast_bloom_with_window, import_observations_csv,
    monthly_intensity, summarize_regions, validate_observations,
    BloomForecast, ClassifiedRecord, DeriveOptions, DerivedRecord, MonthlyIntensity,
    Observation, RawObservation, RecordClassifier, RegionSummary, SoilMoistureUnit,
};

use crate::config::PipelineConfig;
use crate::error::{AppError, AppResult};

/// Observations plus the options that shape their derivation
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ObservationBatch {
    pub observations: Vec<RawObservation>,
    #[validate(range(min = 1, max = 365))]
    pub window: Option<usize>,
    pub soil_moisture_unit: Option<SoilMoistureUnit>,
}

/// Forecast request: history plus the region and horizon to project
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForecastInput {
    pub observations: Vec<RawObservation>,
    #[validate(length(min = 1, max = 200))]
    pub region: String,
    pub days_ahead: u32,
    pub soil_moisture_unit: Option<SoilMoistureUnit>,
}

/// Options for a CSV upload, taken from the query string
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    #[validate(range(min = 1, max = 365))]
    pub window: Option<usize>,
    pub soil_moisture_unit: Option<SoilMoistureUnit>,
}

/// Records produced by one pipeline invocation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun<T> {
    pub run_id: Uuid,
    pub records: Vec<T>,
}

/// Pipeline service
#[derive(Clone)]
pub struct PipelineService {
    config: PipelineConfig,
}

impl PipelineService {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Validate and derive features for a batch
    pub fn derive(&self, batch: ObservationBatch) -> AppResult<PipelineRun<DerivedRecord>> {
        let run_id = Uuid::new_v4();
        let (observations, options) = self.prepare(batch)?;
        let records = self.derive_observations(run_id, observations, options)?;

        Ok(PipelineRun { run_id, records })
    }

    /// Validate, derive and classify a batch
    pub fn run(&self, batch: ObservationBatch) -> AppResult<PipelineRun<ClassifiedRecord>> {
        let run_id = Uuid::new_v4();
        let (observations, options) = self.prepare(batch)?;
        let records = self.classify_observations(run_id, observations, options)?;

        Ok(PipelineRun { run_id, records })
    }

    /// Project a region's bloom state `days_ahead` days past `today`
    pub fn forecast(&self, input: ForecastInput, today: NaiveDate) -> AppResult<BloomForecast> {
        input.validate()?;

        if input.days_ahead > self.config.max_forecast_days {
            return Err(AppError::InvalidRequest {
                field: Some("daysAhead".to_string()),
                message: format!(
                    "Forecast horizon of {} days exceeds the limit of {}",
                    input.days_ahead, self.config.max_forecast_days
                ),
            });
        }

        let run_id = Uuid::new_v4();
        let (observations, options) = self.prepare(ObservationBatch {
            observations: input.observations,
            window: None,
            soil_moisture_unit: input.soil_moisture_unit,
        })?;
        let history = self.derive_observations(run_id, observations, options)?;

        let forecast = forecast_bloom_with_window(
            &history,
            &input.region,
            input.days_ahead,
            today,
            self.config.forecast_window,
        )?;

        tracing::info!(
            %run_id,
            region = %forecast.region_label,
            days_ahead = forecast.days_ahead,
            basis_points = forecast.basis_points,
            stage = %forecast.stage_label,
            "Bloom forecast computed"
        );

        Ok(forecast)
    }

    /// Monthly bloom intensity per region
    pub fn monthly_intensity(&self, batch: ObservationBatch) -> AppResult<Vec<MonthlyIntensity>> {
        let run_id = Uuid::new_v4();
        let (observations, options) = self.prepare(batch)?;
        let derived = self.derive_observations(run_id, observations, options)?;

        let report = monthly_intensity(&derived, self.config.intensity_window)?;
        tracing::info!(%run_id, months = report.len(), "Monthly intensity report built");

        Ok(report)
    }

    /// Per-region dashboard summaries
    pub fn region_summaries(&self, batch: ObservationBatch) -> AppResult<Vec<RegionSummary>> {
        let run_id = Uuid::new_v4();
        let (observations, options) = self.prepare(batch)?;
        let classified = self.classify_observations(run_id, observations, options)?;

        let summaries = summarize_regions(&classified);
        tracing::info!(%run_id, regions = summaries.len(), "Region summaries built");

        Ok(summaries)
    }

    /// Run the pipeline and render the dashboard CSV
    pub fn export_csv(&self, batch: ObservationBatch) -> AppResult<String> {
        let run = self.run(batch)?;
        let csv = export_csv(&run.records).context("Failed to write CSV export")?;

        tracing::info!(run_id = %run.run_id, rows = run.records.len(), "CSV export written");
        Ok(csv)
    }

    /// Parse an uploaded observation CSV and run the pipeline over it
    pub fn import_csv(
        &self,
        data: &str,
        options: ImportOptions,
    ) -> AppResult<PipelineRun<ClassifiedRecord>> {
        options.validate()?;

        let observations =
            import_observations_csv(data).map_err(|e| AppError::InvalidCsv(e.to_string()))?;
        tracing::debug!(rows = observations.len(), "CSV upload parsed");

        self.run(ObservationBatch {
            observations,
            window: options.window,
            soil_moisture_unit: options.soil_moisture_unit,
        })
    }

    /// Enforce request limits, validate raw records and resolve options
    fn prepare(&self, batch: ObservationBatch) -> AppResult<(Vec<Observation>, DeriveOptions)> {
        batch.validate()?;

        let count = batch.observations.len();
        if count > self.config.max_observations {
            return Err(AppError::PayloadTooLarge {
                count,
                limit: self.config.max_observations,
            });
        }

        let unit = batch
            .soil_moisture_unit
            .unwrap_or(self.config.soil_moisture_unit);
        let observations = validate_observations(batch.observations, unit)?;
        let options = DeriveOptions {
            window: batch.window.unwrap_or(self.config.rolling_window),
        };

        Ok((observations, options))
    }

    fn derive_observations(
        &self,
        run_id: Uuid,
        observations: Vec<Observation>,
        options: DeriveOptions,
    ) -> AppResult<Vec<DerivedRecord>> {
        let count = observations.len();
        let derived = derive_with(observations, options).map_err(|e| {
            tracing::warn!(%run_id, error = %e, "Derivation rejected input");
            e
        })?;

        tracing::info!(%run_id, observations = count, window = options.window, "Series derived");
        Ok(derived)
    }

    fn classify_observations(
        &self,
        run_id: Uuid,
        observations: Vec<Observation>,
        options: DeriveOptions,
    ) -> AppResult<Vec<ClassifiedRecord>> {
        let derived = self.derive_observations(run_id, observations, options)?;
        let classifier = RecordClassifier::new();
        let classified: Vec<ClassifiedRecord> = derived
            .into_iter()
            .map(|record| classifier.classify(record))
            .collect();

        tracing::debug!(
            %run_id,
            records = classified.len(),
            tables = ?classifier.table_names(),
            "Series classified"
        );
        Ok(classified)
    }
}
