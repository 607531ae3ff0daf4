//! Threshold classifiers
//!
//! Every classification domain (bloom stage, health, desertification, pollen)
//! is an ordered [`RuleTable`]: the first rule whose predicate holds decides
//! the label, and the table's fallback applies when none does.
//!
//! Confidence values are fixed per rule. They are placeholders standing in
//! for a trained model, not calibrated probabilities.

use serde::{Deserialize, Serialize};

use crate::features::DeriveOptions;
use crate::error::ValidationError;
use crate::models::{
    BloomIntensity, BloomStage, ClassifiedRecord, DerivedRecord, HealthStatus, Observation,
    RiskLevel,
};

/// One ordered rule of a table
pub struct Rule<F, L> {
    pub label: L,
    pub base_confidence: f64,
    pub when: fn(&F) -> bool,
}

/// Ordered rule list over a feature record
pub struct RuleTable<F, L> {
    pub name: &'static str,
    pub rules: Vec<Rule<F, L>>,
    pub fallback: L,
    pub fallback_confidence: f64,
}

impl<F, L: Copy> RuleTable<F, L> {
    /// First matching rule wins.
    pub fn evaluate(&self, features: &F) -> Classification<L> {
        self.rules
            .iter()
            .find(|rule| (rule.when)(features))
            .map(|rule| Classification {
                label: rule.label,
                confidence: rule.base_confidence,
            })
            .unwrap_or(Classification {
                label: self.fallback,
                confidence: self.fallback_confidence,
            })
    }
}

/// Label with the confidence of the rule that produced it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Classification<L> {
    pub label: L,
    pub confidence: f64,
}

// ============================================================================
// Bloom stage
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageFeatures {
    pub vegetation_index: f64,
    pub slope: f64,
    pub soil_moisture: f64,
    pub temperature: f64,
}

/// Bloom stage table. Order encodes priority.
pub fn bloom_stage_rules() -> RuleTable<StageFeatures, BloomStage> {
    RuleTable {
        name: "bloom_stage",
        rules: vec![
            Rule {
                label: BloomStage::PreBloom,
                base_confidence: 0.85,
                when: |f: &StageFeatures| f.vegetation_index < 0.3,
            },
            Rule {
                label: BloomStage::Onset,
                base_confidence: 0.82,
                when: |f: &StageFeatures| (0.3..0.5).contains(&f.vegetation_index) && f.slope > 0.0,
            },
            Rule {
                label: BloomStage::Peak,
                base_confidence: 0.88,
                when: |f: &StageFeatures| (0.5..0.7).contains(&f.vegetation_index) && f.temperature > 15.0,
            },
            Rule {
                label: BloomStage::Decline,
                base_confidence: 0.80,
                when: |f: &StageFeatures| f.slope < -0.02 && f.vegetation_index > 0.3,
            },
        ],
        fallback: BloomStage::PostBloom,
        fallback_confidence: 0.75,
    }
}

pub fn classify_stage(features: &StageFeatures) -> Classification<BloomStage> {
    bloom_stage_rules().evaluate(features)
}

// ============================================================================
// Bloom intensity
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntensityFeatures {
    pub vegetation_index: f64,
    pub secondary_index: f64,
    pub soil_moisture: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntensityAssessment {
    pub label: BloomIntensity,
    pub score: f64,
    /// `score * 100`
    pub display_score: f64,
}

/// Mean of NDVI and EVI, boosted by up to 30% with soil moisture.
pub fn intensity_score(features: &IntensityFeatures) -> f64 {
    ((features.vegetation_index + features.secondary_index) / 2.0)
        * (1.0 + features.soil_moisture * 0.3)
}

pub fn classify_intensity(features: &IntensityFeatures) -> IntensityAssessment {
    let score = intensity_score(features);
    let label = if score < 0.4 {
        BloomIntensity::Mild
    } else if score < 0.6 {
        BloomIntensity::Moderate
    } else {
        BloomIntensity::Peak
    };

    IntensityAssessment {
        label,
        score,
        display_score: score * 100.0,
    }
}

// ============================================================================
// Vegetation health
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthFeatures {
    pub vegetation_index: f64,
    pub soil_moisture: f64,
    pub temperature: f64,
}

pub fn health_rules() -> RuleTable<HealthFeatures, HealthStatus> {
    RuleTable {
        name: "health_status",
        rules: vec![
            Rule {
                label: HealthStatus::Healthy,
                base_confidence: 0.90,
                when: |f: &HealthFeatures| f.vegetation_index >= 0.6 && f.soil_moisture >= 0.25,
            },
            Rule {
                label: HealthStatus::Moderate,
                base_confidence: 0.80,
                when: |f: &HealthFeatures| f.vegetation_index >= 0.4 && f.temperature <= 35.0,
            },
        ],
        fallback: HealthStatus::Stressed,
        fallback_confidence: 0.85,
    }
}

pub fn classify_health(features: &HealthFeatures) -> Classification<HealthStatus> {
    health_rules().evaluate(features)
}

// ============================================================================
// Desertification risk
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesertificationFeatures {
    pub vegetation_index: f64,
    pub soil_moisture: f64,
    pub precipitation_anomaly: f64,
    pub temperature_anomaly: f64,
}

pub fn desertification_rules() -> RuleTable<DesertificationFeatures, RiskLevel> {
    RuleTable {
        name: "desertification_risk",
        rules: vec![
            Rule {
                label: RiskLevel::Critical,
                base_confidence: 0.90,
                when: |f: &DesertificationFeatures| f.vegetation_index < 0.1 && f.soil_moisture < 0.1,
            },
            Rule {
                label: RiskLevel::High,
                base_confidence: 0.85,
                when: |f: &DesertificationFeatures| {
                    f.vegetation_index < 0.2
                        || (f.soil_moisture < 0.15 && f.precipitation_anomaly < -1.0)
                },
            },
            Rule {
                label: RiskLevel::Moderate,
                base_confidence: 0.78,
                when: |f: &DesertificationFeatures| f.vegetation_index < 0.35 || f.temperature_anomaly > 1.5,
            },
        ],
        fallback: RiskLevel::Low,
        fallback_confidence: 0.80,
    }
}

pub fn classify_desertification(features: &DesertificationFeatures) -> Classification<RiskLevel> {
    desertification_rules().evaluate(features)
}

// ============================================================================
// Pollen risk
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollenFeatures {
    pub vegetation_index: f64,
    pub temperature: f64,
    pub precipitation: f64,
}

pub fn pollen_rules() -> RuleTable<PollenFeatures, RiskLevel> {
    RuleTable {
        name: "pollen_risk",
        rules: vec![
            Rule {
                label: RiskLevel::High,
                base_confidence: 0.84,
                when: |f: &PollenFeatures| {
                    f.vegetation_index >= 0.5 && f.temperature >= 20.0 && f.precipitation < 5.0
                },
            },
            Rule {
                label: RiskLevel::Moderate,
                base_confidence: 0.78,
                when: |f: &PollenFeatures| f.vegetation_index >= 0.3 && f.temperature >= 12.0,
            },
        ],
        fallback: RiskLevel::Low,
        fallback_confidence: 0.80,
    }
}

pub fn classify_pollen(features: &PollenFeatures) -> Classification<RiskLevel> {
    pollen_rules().evaluate(features)
}

// ============================================================================
// Records
// ============================================================================

/// Evaluates every table against derived records.
///
/// Builds the tables once; prefer it over the per-feature functions when
/// classifying whole series.
pub struct RecordClassifier {
    stage: RuleTable<StageFeatures, BloomStage>,
    health: RuleTable<HealthFeatures, HealthStatus>,
    desertification: RuleTable<DesertificationFeatures, RiskLevel>,
    pollen: RuleTable<PollenFeatures, RiskLevel>,
}

impl Default for RecordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordClassifier {
    pub fn new() -> Self {
        Self {
            stage: bloom_stage_rules(),
            health: health_rules(),
            desertification: desertification_rules(),
            pollen: pollen_rules(),
        }
    }

    /// Names of the rule tables applied to every record, in evaluation order
    pub fn table_names(&self) -> [&'static str; 4] {
        [
            self.stage.name,
            self.health.name,
            self.desertification.name,
            self.pollen.name,
        ]
    }

    pub fn classify(&self, record: DerivedRecord) -> ClassifiedRecord {
        let obs = &record.observation;

        let stage = self.stage.evaluate(&StageFeatures {
            vegetation_index: obs.vegetation_index,
            slope: record.slope,
            soil_moisture: obs.soil_moisture,
            temperature: obs.temperature,
        });
        let intensity = classify_intensity(&IntensityFeatures {
            vegetation_index: obs.vegetation_index,
            secondary_index: obs.secondary_index,
            soil_moisture: obs.soil_moisture,
        });
        let health = self.health.evaluate(&HealthFeatures {
            vegetation_index: obs.vegetation_index,
            soil_moisture: obs.soil_moisture,
            temperature: obs.temperature,
        });
        let desertification = self.desertification.evaluate(&DesertificationFeatures {
            vegetation_index: obs.vegetation_index,
            soil_moisture: obs.soil_moisture,
            precipitation_anomaly: record.precipitation_anomaly,
            temperature_anomaly: record.temperature_anomaly,
        });
        let pollen = self.pollen.evaluate(&PollenFeatures {
            vegetation_index: obs.vegetation_index,
            temperature: obs.temperature,
            precipitation: obs.precipitation,
        });

        ClassifiedRecord {
            derived: record,
            stage_label: stage.label,
            intensity_label: intensity.label,
            intensity_score: intensity.display_score,
            confidence: stage.confidence,
            health_status: health.label,
            desertification_risk: desertification.label,
            pollen_risk: pollen.label,
        }
    }
}

pub fn classify_record(record: DerivedRecord) -> ClassifiedRecord {
    RecordClassifier::new().classify(record)
}

pub fn classify_records(records: Vec<DerivedRecord>) -> Vec<ClassifiedRecord> {
    let classifier = RecordClassifier::new();
    records
        .into_iter()
        .map(|record| classifier.classify(record))
        .collect()
}

/// Derive then classify.
pub fn run_pipeline(
    observations: Vec<Observation>,
    options: DeriveOptions,
) -> Result<Vec<ClassifiedRecord>, ValidationError> {
    let derived = crate::features::derive_with(observations, options)?;
    Ok(classify_records(derived))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(ndvi: f64, slope: f64, temp: f64) -> BloomStage {
        classify_stage(&StageFeatures {
            vegetation_index: ndvi,
            slope,
            soil_moisture: 0.3,
            temperature: temp,
        })
        .label
    }

    #[test]
    fn test_stage_rules_in_order() {
        assert_eq!(stage(0.2, 0.1, 20.0), BloomStage::PreBloom);
        assert_eq!(stage(0.4, 0.05, 20.0), BloomStage::Onset);
        assert_eq!(stage(0.6, 0.0, 20.0), BloomStage::Peak);
        assert_eq!(stage(0.6, -0.05, 10.0), BloomStage::Decline);
        assert_eq!(stage(0.8, 0.0, 20.0), BloomStage::PostBloom);
    }

    #[test]
    fn test_peak_beats_decline() {
        // Matches both Peak and Decline; Peak comes first.
        assert_eq!(stage(0.6, -0.05, 20.0), BloomStage::Peak);
    }

    #[test]
    fn test_stage_boundaries() {
        // 0.3 is not Pre-bloom, and without a rising slope it is not Onset.
        let label = stage(0.3, 0.0, 20.0);
        assert_ne!(label, BloomStage::PreBloom);
        assert_ne!(label, BloomStage::Onset);
        assert_eq!(label, BloomStage::PostBloom);
        // 0.5 belongs to the Peak band, not Onset.
        assert_eq!(stage(0.5, 0.1, 20.0), BloomStage::Peak);
        // 0.7 is past the Peak band.
        assert_eq!(stage(0.7, 0.0, 20.0), BloomStage::PostBloom);
        // Decline needs strictly more than 0.3.
        assert_eq!(stage(0.3, -0.05, 20.0), BloomStage::PostBloom);
    }

    #[test]
    fn test_stage_confidence_per_rule() {
        let c = |ndvi, slope, temp| {
            classify_stage(&StageFeatures {
                vegetation_index: ndvi,
                slope,
                soil_moisture: 0.3,
                temperature: temp,
            })
            .confidence
        };
        assert_eq!(c(0.2, 0.0, 20.0), 0.85);
        assert_eq!(c(0.4, 0.1, 20.0), 0.82);
        assert_eq!(c(0.6, 0.0, 20.0), 0.88);
        assert_eq!(c(0.6, -0.1, 10.0), 0.80);
        assert_eq!(c(0.9, 0.0, 20.0), 0.75);
    }

    #[test]
    fn test_intensity_thresholds() {
        let assess = |ndvi, evi, soil| {
            classify_intensity(&IntensityFeatures {
                vegetation_index: ndvi,
                secondary_index: evi,
                soil_moisture: soil,
            })
        };
        assert_eq!(assess(0.2, 0.2, 0.0).label, BloomIntensity::Mild);
        assert_eq!(assess(0.5, 0.5, 0.0).label, BloomIntensity::Moderate);
        assert_eq!(assess(0.6, 0.6, 0.0).label, BloomIntensity::Peak);
        // Soil moisture pushes 0.5 up to 0.65
        let wet = assess(0.5, 0.5, 1.0);
        assert_eq!(wet.label, BloomIntensity::Peak);
        assert!((wet.score - 0.65).abs() < 1e-9);
        assert!((wet.display_score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_rules() {
        let h = |ndvi, soil, temp| {
            classify_health(&HealthFeatures {
                vegetation_index: ndvi,
                soil_moisture: soil,
                temperature: temp,
            })
            .label
        };
        assert_eq!(h(0.7, 0.3, 25.0), HealthStatus::Healthy);
        assert_eq!(h(0.7, 0.1, 25.0), HealthStatus::Moderate);
        assert_eq!(h(0.45, 0.3, 38.0), HealthStatus::Stressed);
        assert_eq!(h(0.2, 0.5, 20.0), HealthStatus::Stressed);
    }

    #[test]
    fn test_desertification_rules() {
        let d = |ndvi, soil, precip_z, temp_z| {
            classify_desertification(&DesertificationFeatures {
                vegetation_index: ndvi,
                soil_moisture: soil,
                precipitation_anomaly: precip_z,
                temperature_anomaly: temp_z,
            })
            .label
        };
        assert_eq!(d(0.05, 0.05, 0.0, 0.0), RiskLevel::Critical);
        assert_eq!(d(0.15, 0.3, 0.0, 0.0), RiskLevel::High);
        assert_eq!(d(0.4, 0.1, -1.5, 0.0), RiskLevel::High);
        assert_eq!(d(0.3, 0.3, 0.0, 0.0), RiskLevel::Moderate);
        assert_eq!(d(0.5, 0.3, 0.0, 2.0), RiskLevel::Moderate);
        assert_eq!(d(0.5, 0.3, 0.0, 0.0), RiskLevel::Low);
    }

    #[test]
    fn test_pollen_rules() {
        let p = |ndvi, temp, precip| {
            classify_pollen(&PollenFeatures {
                vegetation_index: ndvi,
                temperature: temp,
                precipitation: precip,
            })
            .label
        };
        assert_eq!(p(0.6, 24.0, 1.0), RiskLevel::High);
        assert_eq!(p(0.6, 24.0, 12.0), RiskLevel::Moderate);
        assert_eq!(p(0.35, 14.0, 0.0), RiskLevel::Moderate);
        assert_eq!(p(0.2, 30.0, 0.0), RiskLevel::Low);
    }

    #[test]
    fn test_custom_table_fallback() {
        let table: RuleTable<f64, u8> = RuleTable {
            name: "test",
            rules: vec![Rule {
                label: 1,
                base_confidence: 0.9,
                when: |v: &f64| *v > 10.0,
            }],
            fallback: 0,
            fallback_confidence: 0.5,
        };
        assert_eq!(table.evaluate(&11.0).label, 1);
        let fallback = table.evaluate(&3.0);
        assert_eq!(fallback.label, 0);
        assert_eq!(fallback.confidence, 0.5);
        assert_eq!(table.name, "test");
    }

    #[test]
    fn test_record_classifier_table_names() {
        assert_eq!(
            RecordClassifier::new().table_names(),
            ["bloom_stage", "health_status", "desertification_risk", "pollen_risk"]
        );
    }
}
