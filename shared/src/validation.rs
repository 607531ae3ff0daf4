//! Validation of observations at the input boundary
//!
//! Raw records arrive with optional fields and in whatever soil moisture unit
//! the source uses. Everything downstream of [`validate_observations`] may
//! assume finite numbers in their nominal ranges.

use rust_decimal::prelude::ToPrimitive;

use crate::error::ValidationError;
use crate::models::{
    Observation, RawObservation, INDEX_RANGE, LATITUDE_RANGE, LONGITUDE_RANGE,
    SOIL_MOISTURE_RANGE,
};
use crate::types::SoilMoistureUnit;

/// Convert raw records into validated observations.
///
/// Fails on the first offending record; the error carries its input index.
pub fn validate_observations(
    raw: Vec<RawObservation>,
    unit: SoilMoistureUnit,
) -> Result<Vec<Observation>, ValidationError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| validate_observation(index, record, unit))
        .collect()
}

/// Convert one raw record, normalizing soil moisture to a fraction.
pub fn validate_observation(
    index: usize,
    raw: RawObservation,
    unit: SoilMoistureUnit,
) -> Result<Observation, ValidationError> {
    let observation = Observation {
        timestamp: required(index, "timestamp", raw.timestamp)?,
        latitude: required(index, "latitude", raw.latitude)?,
        longitude: required(index, "longitude", raw.longitude)?,
        vegetation_index: required(index, "vegetationIndex", raw.vegetation_index)?,
        secondary_index: required(index, "secondaryIndex", raw.secondary_index)?,
        soil_moisture: unit.to_fraction(required(index, "soilMoisture", raw.soil_moisture)?),
        temperature: required(index, "temperature", raw.temperature)?,
        precipitation: required(index, "precipitation", raw.precipitation)?,
        region_label: required(index, "regionLabel", raw.region_label)?,
    };

    check_observation(index, &observation)?;
    Ok(observation)
}

/// Check an already-typed observation.
pub fn check_observation(index: usize, obs: &Observation) -> Result<(), ValidationError> {
    if obs.region_label.trim().is_empty() {
        return Err(ValidationError::EmptyRegion { index });
    }

    check_range(index, "vegetationIndex", obs.vegetation_index, INDEX_RANGE)?;
    check_range(index, "secondaryIndex", obs.secondary_index, INDEX_RANGE)?;
    check_range(index, "soilMoisture", obs.soil_moisture, SOIL_MOISTURE_RANGE)?;
    check_finite(index, "temperature", obs.temperature)?;
    check_range(index, "precipitation", obs.precipitation, (0.0, f64::MAX))?;

    // Decimals are always finite; only the range needs checking.
    let latitude = obs.latitude.to_f64().unwrap_or(f64::NAN);
    check_range(index, "latitude", latitude, LATITUDE_RANGE)?;
    let longitude = obs.longitude.to_f64().unwrap_or(f64::NAN);
    check_range(index, "longitude", longitude, LONGITUDE_RANGE)?;

    Ok(())
}

/// Structural check the deriver applies to typed input: a region label and
/// finite numbers. Values outside the nominal ranges are accepted.
pub fn check_derivable(index: usize, obs: &Observation) -> Result<(), ValidationError> {
    if obs.region_label.trim().is_empty() {
        return Err(ValidationError::EmptyRegion { index });
    }

    check_finite(index, "vegetationIndex", obs.vegetation_index)?;
    check_finite(index, "secondaryIndex", obs.secondary_index)?;
    check_finite(index, "soilMoisture", obs.soil_moisture)?;
    check_finite(index, "temperature", obs.temperature)?;
    check_finite(index, "precipitation", obs.precipitation)?;

    Ok(())
}

/// Validate a rolling window width
pub fn validate_window(width: usize) -> Result<(), ValidationError> {
    if width == 0 {
        return Err(ValidationError::InvalidWindow { width });
    }
    Ok(())
}

fn required<T>(index: usize, field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { index, field })
}

fn check_finite(index: usize, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { index, field, value });
    }
    Ok(())
}

fn check_range(
    index: usize,
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ValidationError> {
    check_finite(index, field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            index,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn raw() -> RawObservation {
        RawObservation {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1),
            latitude: Some(Decimal::new(-12, 1)),
            longitude: Some(Decimal::new(365, 1)),
            vegetation_index: Some(0.42),
            secondary_index: Some(0.31),
            soil_moisture: Some(0.28),
            temperature: Some(24.5),
            precipitation: Some(3.2),
            region_label: Some("Kenya".to_string()),
        }
    }

    #[test]
    fn test_valid_observation() {
        let obs = validate_observation(0, raw(), SoilMoistureUnit::Fraction).unwrap();
        assert_eq!(obs.region_label, "Kenya");
        assert_eq!(obs.soil_moisture, 0.28);
    }

    #[test]
    fn test_percent_soil_moisture_normalized() {
        let mut record = raw();
        record.soil_moisture = Some(28.0);
        let obs = validate_observation(0, record, SoilMoistureUnit::Percent).unwrap();
        assert!((obs.soil_moisture - 0.28).abs() < 1e-12);
    }

    #[test]
    fn test_percent_reading_declared_as_fraction_rejected() {
        let mut record = raw();
        record.soil_moisture = Some(28.0);
        let err = validate_observation(3, record, SoilMoistureUnit::Fraction).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { index: 3, field: "soilMoisture", .. }
        ));
    }

    #[test]
    fn test_missing_field_named() {
        let mut record = raw();
        record.temperature = None;
        let err = validate_observation(7, record, SoilMoistureUnit::Fraction).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                index: 7,
                field: "temperature"
            }
        );
        assert_eq!(err.to_string(), "record 7: missing field `temperature`");
    }

    #[test]
    fn test_nan_rejected() {
        let mut record = raw();
        record.vegetation_index = Some(f64::NAN);
        let err = validate_observation(0, record, SoilMoistureUnit::Fraction).unwrap_err();
        assert!(matches!(err, ValidationError::NonFinite { field: "vegetationIndex", .. }));
    }

    #[test]
    fn test_empty_region_rejected() {
        let mut record = raw();
        record.region_label = Some("   ".to_string());
        let err = validate_observation(2, record, SoilMoistureUnit::Fraction).unwrap_err();
        assert_eq!(err, ValidationError::EmptyRegion { index: 2 });
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let mut record = raw();
        record.precipitation = Some(-0.5);
        assert!(validate_observation(0, record, SoilMoistureUnit::Fraction).is_err());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let mut record = raw();
        record.latitude = Some(Decimal::from(91));
        let err = validate_observation(0, record, SoilMoistureUnit::Fraction).unwrap_err();
        assert_eq!(err.field(), Some("latitude"));
    }

    #[test]
    fn test_first_bad_record_reported() {
        let mut bad = raw();
        bad.secondary_index = None;
        let err = validate_observations(vec![raw(), raw(), bad], SoilMoistureUnit::Fraction)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                index: 2,
                field: "secondaryIndex"
            }
        );
    }

    #[test]
    fn test_window_validation() {
        assert!(validate_window(1).is_ok());
        assert!(validate_window(5).is_ok());
        assert_eq!(
            validate_window(0),
            Err(ValidationError::InvalidWindow { width: 0 })
        );
    }
}
