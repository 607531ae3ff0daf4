//! Common types used across the pipeline

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Arithmetic centroid of a set of points. `None` for an empty set.
    ///
    /// Good enough for the region extents we deal with; it does not handle
    /// sets that straddle the antimeridian.
    pub fn centroid<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GpsCoordinates>,
    {
        let mut count = 0u32;
        let mut lat = Decimal::ZERO;
        let mut lon = Decimal::ZERO;
        for point in points {
            lat += point.latitude;
            lon += point.longitude;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = Decimal::from(count);
        Some(Self::new((lat / n).normalize(), (lon / n).normalize()))
    }
}

/// Unit the caller reports soil moisture in.
///
/// Dashboards disagree: some sensors report a volumetric fraction, others a
/// percentage. Everything past the input boundary works in fractions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoilMoistureUnit {
    #[default]
    Fraction,
    Percent,
}

impl SoilMoistureUnit {
    /// Convert a raw reading in this unit to a fraction.
    pub fn to_fraction(self, value: f64) -> f64 {
        match self {
            SoilMoistureUnit::Fraction => value,
            SoilMoistureUnit::Percent => value / 100.0,
        }
    }
}

/// Date range (inclusive on both ends)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
