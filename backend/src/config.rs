//! Configuration management for the BloomWatch analytics server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BLOOMWATCH_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    SoilMoistureUnit, DEFAULT_FORECAST_WINDOW, DEFAULT_ROLLING_WINDOW, INTENSITY_ROLLING_WINDOW,
    MAX_FORECAST_DAYS,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Analytics pipeline configuration
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Centered rolling window used when a request does not name one
    pub rolling_window: usize,

    /// Rolling window over monthly means
    pub intensity_window: usize,

    /// Recent records averaged by the forecast
    pub forecast_window: usize,

    /// Soil moisture unit assumed when a request does not declare one
    pub soil_moisture_unit: SoilMoistureUnit,

    /// Observations accepted per request
    pub max_observations: usize,

    /// Furthest forecast horizon in days
    pub max_forecast_days: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BLOOMWATCH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.max_body_bytes", 16 * 1024 * 1024)?
            .set_default("pipeline.rolling_window", DEFAULT_ROLLING_WINDOW as u64)?
            .set_default("pipeline.intensity_window", INTENSITY_ROLLING_WINDOW as u64)?
            .set_default("pipeline.forecast_window", DEFAULT_FORECAST_WINDOW as u64)?
            .set_default("pipeline.soil_moisture_unit", "fraction")?
            .set_default("pipeline.max_observations", 10_000)?
            .set_default("pipeline.max_forecast_days", MAX_FORECAST_DAYS as u64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BLOOMWATCH_ prefix)
            .add_source(
                Environment::with_prefix("BLOOMWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW,
            intensity_window: INTENSITY_ROLLING_WINDOW,
            forecast_window: DEFAULT_FORECAST_WINDOW,
            soil_moisture_unit: SoilMoistureUnit::Fraction,
            max_observations: 10_000,
            max_forecast_days: MAX_FORECAST_DAYS,
        }
    }
}
