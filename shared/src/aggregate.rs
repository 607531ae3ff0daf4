//! Per-month and per-region aggregation of pipeline output

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::classify::{classify_intensity, IntensityFeatures};
use crate::error::ValidationError;
use crate::models::{ClassifiedRecord, DerivedRecord, MonthlyIntensity, RegionSummary};
use crate::stats::{mean, rolling_average};
use crate::types::{DateRange, GpsCoordinates};
use crate::validation::validate_window;

/// Z-score magnitude above which a record counts as anomalous
pub const ANOMALY_THRESHOLD: f64 = 2.0;

/// Monthly bloom intensity per region.
///
/// Monthly NDVI/EVI means are smoothed with a centered rolling window over
/// the region's months (3 on the dashboards) before the intensity is scored.
/// Regions come out in first-appearance order, months in ascending order.
pub fn monthly_intensity(
    records: &[DerivedRecord],
    window: usize,
) -> Result<Vec<MonthlyIntensity>, ValidationError> {
    validate_window(window)?;

    let mut out = Vec::new();
    for (region, group) in regions_in_order(records, |r| r.region_label()) {
        let mut months: BTreeMap<NaiveDate, Vec<&DerivedRecord>> = BTreeMap::new();
        for record in group {
            months.entry(month_start(record.timestamp())).or_default().push(record);
        }

        let means: Vec<(NaiveDate, usize, f64, f64, f64)> = months
            .into_iter()
            .map(|(month, rows)| {
                let field_mean =
                    |f: fn(&DerivedRecord) -> f64| mean(&rows.iter().map(|r| f(r)).collect::<Vec<_>>());
                (
                    month,
                    rows.len(),
                    field_mean(|r| r.observation.vegetation_index),
                    field_mean(|r| r.observation.secondary_index),
                    field_mean(|r| r.observation.soil_moisture),
                )
            })
            .collect();

        let ndvi: Vec<f64> = means.iter().map(|m| m.2).collect();
        let evi: Vec<f64> = means.iter().map(|m| m.3).collect();
        let smoothed_ndvi = rolling_average(&ndvi, window);
        let smoothed_evi = rolling_average(&evi, window);

        for (i, (month, count, mean_ndvi, mean_evi, mean_soil)) in means.into_iter().enumerate() {
            let intensity = classify_intensity(&IntensityFeatures {
                vegetation_index: smoothed_ndvi[i],
                secondary_index: smoothed_evi[i],
                soil_moisture: mean_soil,
            });
            out.push(MonthlyIntensity {
                region_label: region.to_string(),
                month,
                observation_count: count,
                mean_vegetation_index: mean_ndvi,
                mean_secondary_index: mean_evi,
                mean_soil_moisture: mean_soil,
                smoothed_vegetation_index: smoothed_ndvi[i],
                smoothed_secondary_index: smoothed_evi[i],
                intensity_label: intensity.label,
                intensity_score: intensity.display_score,
            });
        }
    }

    Ok(out)
}

/// One summary per region, in first-appearance order.
pub fn summarize_regions(records: &[ClassifiedRecord]) -> Vec<RegionSummary> {
    regions_in_order(records, |r| r.region_label())
        .into_iter()
        .filter_map(|(region, group)| summarize_region(region, &group))
        .collect()
}

fn summarize_region(region: &str, group: &[&ClassifiedRecord]) -> Option<RegionSummary> {
    let first = group.iter().min_by_key(|r| r.timestamp())?;
    // max_by_key returns the last maximum, so same-day records resolve to
    // the one that came later in the input.
    let latest = group.iter().max_by_key(|r| r.timestamp())?;
    let peak = group.iter().copied().reduce(|best, r| {
        if r.observation().vegetation_index > best.observation().vegetation_index {
            r
        } else {
            best
        }
    })?;

    let locations: Vec<GpsCoordinates> = group.iter().map(|r| r.observation().location()).collect();
    let ndvi: Vec<f64> = group.iter().map(|r| r.observation().vegetation_index).collect();
    let anomaly_count = group
        .iter()
        .filter(|r| {
            r.derived.temperature_anomaly.abs() > ANOMALY_THRESHOLD
                || r.derived.precipitation_anomaly.abs() > ANOMALY_THRESHOLD
        })
        .count();

    Some(RegionSummary {
        region_label: region.to_string(),
        observation_count: group.len(),
        period: DateRange {
            start: first.timestamp(),
            end: latest.timestamp(),
        },
        centroid: GpsCoordinates::centroid(&locations)?,
        mean_vegetation_index: mean(&ndvi),
        peak_vegetation_index: peak.observation().vegetation_index,
        peak_date: peak.timestamp(),
        latest_stage: latest.stage_label,
        anomaly_count,
    })
}

fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// Group borrowed records by region, keeping first-appearance order.
fn regions_in_order<'a, T>(
    records: &'a [T],
    region_of: fn(&T) -> &str,
) -> Vec<(&'a str, Vec<&'a T>)> {
    let mut groups: Vec<(&'a str, Vec<&'a T>)> = Vec::new();
    for record in records {
        let region = region_of(record);
        match groups.iter_mut().find(|(name, _)| *name == region) {
            Some((_, rows)) => rows.push(record),
            None => groups.push((region, vec![record])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_records;
    use crate::features::derive;
    use crate::models::{BloomIntensity, BloomStage, Observation};
    use rust_decimal::Decimal;

    fn obs(region: &str, month: u32, day: u32, ndvi: f64) -> Observation {
        Observation {
            timestamp: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
            latitude: Decimal::new(36, 0),
            longitude: Decimal::new(-120, 0),
            vegetation_index: ndvi,
            secondary_index: ndvi,
            soil_moisture: 0.0,
            temperature: 20.0,
            precipitation: 0.0,
            region_label: region.to_string(),
        }
    }

    #[test]
    fn test_monthly_means() {
        let records = derive(vec![
            obs("Central Valley", 3, 1, 0.2),
            obs("Central Valley", 3, 15, 0.4),
            obs("Central Valley", 4, 1, 0.7),
        ])
        .unwrap();
        let months = monthly_intensity(&records, 1).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(months[0].observation_count, 2);
        assert!((months[0].mean_vegetation_index - 0.3).abs() < 1e-9);
        assert_eq!(months[0].intensity_label, BloomIntensity::Mild);
        assert_eq!(months[1].intensity_label, BloomIntensity::Peak);
    }

    #[test]
    fn test_monthly_smoothing() {
        let records = derive(vec![
            obs("Central Valley", 3, 1, 0.2),
            obs("Central Valley", 4, 1, 0.5),
            obs("Central Valley", 5, 1, 0.8),
        ])
        .unwrap();
        let months = monthly_intensity(&records, 3).unwrap();
        assert!((months[1].smoothed_vegetation_index - 0.5).abs() < 1e-9);
        assert!((months[0].smoothed_vegetation_index - 0.35).abs() < 1e-9);
        assert_eq!(months[1].intensity_label, BloomIntensity::Moderate);
    }

    #[test]
    fn test_monthly_zero_window_rejected() {
        assert!(monthly_intensity(&[], 0).is_err());
    }

    #[test]
    fn test_region_summary() {
        let records = classify_records(
            derive(vec![
                obs("Mojave", 3, 1, 0.2),
                obs("Sahel", 3, 1, 0.1),
                obs("Mojave", 3, 20, 0.55),
                obs("Mojave", 3, 10, 0.6),
            ])
            .unwrap(),
        );
        let summaries = summarize_regions(&records);
        assert_eq!(summaries.len(), 2);

        let mojave = &summaries[0];
        assert_eq!(mojave.region_label, "Mojave");
        assert_eq!(mojave.observation_count, 3);
        assert_eq!(mojave.peak_vegetation_index, 0.6);
        assert_eq!(mojave.peak_date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(mojave.period.days(), 20);
        // Latest record: ndvi 0.55, temperature 20 -> Peak band
        assert_eq!(mojave.latest_stage, BloomStage::Peak);
        assert_eq!(mojave.centroid.latitude, Decimal::new(36, 0));
        assert_eq!(mojave.anomaly_count, 0);

        assert_eq!(summaries[1].region_label, "Sahel");
        assert_eq!(summaries[1].latest_stage, BloomStage::PreBloom);
    }
}
