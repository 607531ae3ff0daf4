//! Error types for the analytics core

use thiserror::Error;

/// Input that the pipeline refuses to compute over.
///
/// `index` is the position of the offending record in the caller's input,
/// before any grouping or sorting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("record {index}: missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index}: field `{field}` is not a finite number ({value})")]
    NonFinite {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("record {index}: field `{field}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("record {index}: region label is empty")]
    EmptyRegion { index: usize },

    #[error("rolling window width must be at least 1, got {width}")]
    InvalidWindow { width: usize },

    #[error("forecast {days_ahead} days ahead falls outside the supported calendar")]
    ForecastHorizon { days_ahead: u32 },
}

impl ValidationError {
    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::NonFinite { field, .. }
            | ValidationError::OutOfRange { field, .. } => Some(field),
            ValidationError::EmptyRegion { .. } => Some("regionLabel"),
            ValidationError::InvalidWindow { .. } => Some("window"),
            ValidationError::ForecastHorizon { .. } => Some("daysAhead"),
        }
    }
}

/// CSV export/import failures
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer error: {0}")]
    Flush(String),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
