use async_trait::async_trait;
use serde::Serialize;

use crate::error::CollaboratorError;
use crate::features::FeatureVector;

/// Risk label for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "LOW"),
            RiskLabel::Medium => write!(f, "MEDIUM"),
            RiskLabel::High => write!(f, "HIGH"),
        }
    }
}

/// Classifier output: a label plus a score in [0.0, 1.0].
/// The pipeline clamps the score at its boundary; label membership is
/// enforced by the enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub label: RiskLabel,
    pub score: f64,
}

/// The risk-classification collaborator.
///
/// Implementations map a feature vector to an assessment. They may call out
/// to a model host; the pipeline treats the call as opaque and never
/// fabricates a default assessment when it fails.
#[async_trait]
pub trait RiskClassifier: Send + Sync {
    async fn classify(&self, features: &FeatureVector)
        -> Result<RiskAssessment, CollaboratorError>;
}

/// Deterministic churn heuristic standing in for a trained model.
///
/// Score 0–1 from file count and churn, bumped for extensions that tend to
/// carry outsized blast radius (schema, infra, lockfiles). Any real model
/// host plugs in behind the RiskClassifier trait without touching the
/// pipeline.
pub struct ChurnClassifier;

/// Extensions that bump the score beyond what raw churn suggests.
const RISKY_EXTENSIONS: &[&str] = &["sql", "tf", "yml", "yaml", "toml", "lock", "env"];

impl ChurnClassifier {
    pub fn new() -> Self {
        ChurnClassifier
    }
}

impl Default for ChurnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RiskClassifier for ChurnClassifier {
    async fn classify(
        &self,
        features: &FeatureVector,
    ) -> Result<RiskAssessment, CollaboratorError> {
        let file_factor = (features.files_changed.min(30) * 2) as f64;
        let churn = features.lines_added + features.lines_deleted;
        let churn_factor = ((churn / 10).min(40)) as f64;
        let mut score = (file_factor + churn_factor) / 100.0;

        for ext in &features.file_extensions {
            if RISKY_EXTENSIONS.contains(&ext.as_str()) {
                score += 0.1;
            }
        }
        let score = score.clamp(0.0, 1.0);

        let label = if score < 0.33 {
            RiskLabel::Low
        } else if score < 0.66 {
            RiskLabel::Medium
        } else {
            RiskLabel::High
        };

        Ok(RiskAssessment { label, score })
    }
}
