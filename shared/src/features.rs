//! Time-series feature derivation
//!
//! Observations are grouped by region, each group is sorted by date, and
//! every numeric feature is computed within its own group only. Mixing
//! regions into one series would carry slopes and anomaly baselines across
//! region boundaries.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::models::{DerivedRecord, Observation};
use crate::stats;
use crate::validation::{check_derivable, validate_window};

/// Rolling window for trend charts
pub const DEFAULT_ROLLING_WINDOW: usize = 5;

/// Rolling window for monthly intensity aggregation
pub const INTENSITY_ROLLING_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Width of the centered rolling window applied to NDVI and EVI
    pub window: usize,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

/// Derive features with the default rolling window.
pub fn derive(series: Vec<Observation>) -> Result<Vec<DerivedRecord>, ValidationError> {
    derive_with(series, DeriveOptions::default())
}

/// Derive features for a possibly multi-region, unsorted series.
///
/// Output holds one record per input observation: region groups in order of
/// each region's first appearance, each group in ascending date order.
pub fn derive_with(
    series: Vec<Observation>,
    options: DeriveOptions,
) -> Result<Vec<DerivedRecord>, ValidationError> {
    validate_window(options.window)?;
    for (index, obs) in series.iter().enumerate() {
        check_derivable(index, obs)?;
    }

    let mut derived = Vec::with_capacity(series.len());
    for group in group_by_region(series) {
        derived.extend(derive_group(group, options.window));
    }
    Ok(derived)
}

/// Split a series into per-region groups, preserving first-appearance order
/// of regions and input order within each region.
pub fn group_by_region(series: Vec<Observation>) -> Vec<Vec<Observation>> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Observation>> = Vec::new();

    for obs in series {
        let slot = match slots.get(&obs.region_label) {
            Some(&slot) => slot,
            None => {
                slots.insert(obs.region_label.clone(), groups.len());
                groups.push(Vec::new());
                groups.len() - 1
            }
        };
        groups[slot].push(obs);
    }

    groups
}

/// Derive one region's records. The group must not be mixed.
fn derive_group(mut group: Vec<Observation>, window: usize) -> Vec<DerivedRecord> {
    // `sort_by_key` is stable: same-day readings keep their input order.
    group.sort_by_key(|obs| obs.timestamp);

    let ndvi: Vec<f64> = group.iter().map(|o| o.vegetation_index).collect();
    let evi: Vec<f64> = group.iter().map(|o| o.secondary_index).collect();
    let temperature: Vec<f64> = group.iter().map(|o| o.temperature).collect();
    let precipitation: Vec<f64> = group.iter().map(|o| o.precipitation).collect();

    let slopes = stats::first_differences(&ndvi);
    let rolling = stats::rolling_average(&ndvi, window);
    let secondary_rolling = stats::rolling_average(&evi, window);
    let temperature_anomalies = stats::z_scores(&temperature);
    let precipitation_anomalies = stats::z_scores(&precipitation);

    group
        .into_iter()
        .enumerate()
        .map(|(i, observation)| DerivedRecord {
            observation,
            slope: slopes[i],
            rolling_average: rolling[i],
            secondary_rolling_average: secondary_rolling[i],
            temperature_anomaly: temperature_anomalies[i],
            precipitation_anomaly: precipitation_anomalies[i],
        })
        .collect()
}
