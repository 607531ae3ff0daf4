//! Categorical labels produced by the classifiers

use serde::{Deserialize, Serialize};

/// Phenological bloom stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloomStage {
    #[serde(rename = "Pre-bloom")]
    PreBloom,
    Onset,
    Peak,
    Decline,
    #[serde(rename = "Post-bloom")]
    PostBloom,
}

impl std::fmt::Display for BloomStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BloomStage::PreBloom => write!(f, "Pre-bloom"),
            BloomStage::Onset => write!(f, "Onset"),
            BloomStage::Peak => write!(f, "Peak"),
            BloomStage::Decline => write!(f, "Decline"),
            BloomStage::PostBloom => write!(f, "Post-bloom"),
        }
    }
}

/// Bloom intensity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloomIntensity {
    Mild,
    Moderate,
    Peak,
}

impl std::fmt::Display for BloomIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BloomIntensity::Mild => write!(f, "Mild"),
            BloomIntensity::Moderate => write!(f, "Moderate"),
            BloomIntensity::Peak => write!(f, "Peak"),
        }
    }
}

/// Vegetation health status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Moderate,
    Stressed,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Moderate => write!(f, "Moderate"),
            HealthStatus::Stressed => write!(f, "Stressed"),
        }
    }
}

/// Risk level shared by the desertification and pollen tables.
/// Pollen risk never reaches `Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}
