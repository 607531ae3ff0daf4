//! CSV export of classified records and CSV import of observations

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::models::{BloomIntensity, BloomStage, ClassifiedRecord, RawObservation};

/// One exported row. Field order is the column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub lat: Decimal,
    pub lon: Decimal,
    pub ndvi: f64,
    pub evi: f64,
    #[serde(rename = "soilMoisture")]
    pub soil_moisture: f64,
    pub temperature: f64,
    pub precipitation: f64,
    #[serde(rename = "bloomStage")]
    pub bloom_stage: BloomStage,
    #[serde(rename = "bloomIntensity")]
    pub bloom_intensity: BloomIntensity,
    pub region: String,
    #[serde(rename = "ndviSlope")]
    pub ndvi_slope: f64,
    #[serde(rename = "ndviRollingAvg")]
    pub ndvi_rolling_avg: f64,
}

impl From<&ClassifiedRecord> for ExportRow {
    fn from(record: &ClassifiedRecord) -> Self {
        let obs = record.observation();
        Self {
            date: obs.timestamp,
            lat: obs.latitude,
            lon: obs.longitude,
            ndvi: obs.vegetation_index,
            evi: obs.secondary_index,
            soil_moisture: obs.soil_moisture,
            temperature: obs.temperature,
            precipitation: obs.precipitation,
            bloom_stage: record.stage_label,
            bloom_intensity: record.intensity_label,
            region: obs.region_label.clone(),
            ndvi_slope: record.derived.slope,
            ndvi_rolling_avg: record.derived.rolling_average,
        }
    }
}

/// Column header of the export, in order
pub const EXPORT_COLUMNS: [&str; 13] = [
    "date",
    "lat",
    "lon",
    "ndvi",
    "evi",
    "soilMoisture",
    "temperature",
    "precipitation",
    "bloomStage",
    "bloomIntensity",
    "region",
    "ndviSlope",
    "ndviRollingAvg",
];

/// Export classified records as CSV, header row first.
///
/// Region labels containing commas or quotes are quoted.
pub fn export_csv(records: &[ClassifiedRecord]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    if records.is_empty() {
        // serialize() only emits the header alongside the first row
        wtr.write_record(EXPORT_COLUMNS)?;
    }
    for record in records {
        wtr.serialize(ExportRow::from(record))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse an export back into rows.
pub fn parse_export_csv(data: &str) -> Result<Vec<ExportRow>, ExportError> {
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    let rows = rdr.deserialize().collect::<Result<Vec<ExportRow>, csv::Error>>()?;
    Ok(rows)
}

/// Observation columns read on import. Anything else in the file is ignored,
/// so an export can be fed straight back in.
#[derive(Debug, Deserialize)]
struct ObservationCsvRow {
    date: Option<NaiveDate>,
    lat: Option<Decimal>,
    lon: Option<Decimal>,
    ndvi: Option<f64>,
    evi: Option<f64>,
    #[serde(rename = "soilMoisture")]
    soil_moisture: Option<f64>,
    temperature: Option<f64>,
    precipitation: Option<f64>,
    region: Option<String>,
}

impl From<ObservationCsvRow> for RawObservation {
    fn from(row: ObservationCsvRow) -> Self {
        Self {
            timestamp: row.date,
            latitude: row.lat,
            longitude: row.lon,
            vegetation_index: row.ndvi,
            secondary_index: row.evi,
            soil_moisture: row.soil_moisture,
            temperature: row.temperature,
            precipitation: row.precipitation,
            region_label: row.region.filter(|r| !r.is_empty()),
        }
    }
}

/// Read observations from CSV. Empty cells become missing fields, left for
/// validation to report.
pub fn import_observations_csv(data: &str) -> Result<Vec<RawObservation>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    let mut out = Vec::new();
    for row in rdr.deserialize::<ObservationCsvRow>() {
        out.push(row?.into());
    }
    Ok(out)
}
