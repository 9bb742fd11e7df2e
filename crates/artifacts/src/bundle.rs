//! Artifact bundles consumed by the two predictors.

use crate::encoder::LabelEncoder;
use crate::error::{ArtifactError, Result};
use crate::forest::{ClassifierPipeline, TreeEnsemble};
use crate::scaler::StandardScaler;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the plan recommender needs, stored as one document.
///
/// Only the model is mandatory. Missing encoders degrade to the code
/// fallback during preprocessing, and a missing `features` list means
/// "use the order preprocessing produced".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationBundle {
    #[serde(alias = "pipeline")]
    pub model: ClassifierPipeline,
    #[serde(default)]
    pub le_plan: Option<LabelEncoder>,
    #[serde(default)]
    pub le_device: Option<LabelEncoder>,
    #[serde(default)]
    pub le_target: Option<LabelEncoder>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

impl RecommendationBundle {
    /// Check that the declared feature order matches the model width.
    pub fn validate(&self) -> Result<()> {
        if let Some(features) = &self.features {
            if features.len() != self.model.n_features() {
                return Err(ArtifactError::ShapeMismatch {
                    context: "recommendation feature list".to_string(),
                    expected: self.model.n_features(),
                    found: features.len(),
                });
            }
        }
        Ok(())
    }
}

/// The churn model ships as three separate files: forest, scaler and a
/// map of per-column label encoders.
#[derive(Debug, Clone)]
pub struct ChurnArtifacts {
    pub model: TreeEnsemble,
    pub scaler: StandardScaler,
    pub encoders: HashMap<String, LabelEncoder>,
}

impl ChurnArtifacts {
    pub fn validate(&self) -> Result<()> {
        if let Some(width) = self.scaler.n_features() {
            if width != self.model.n_features() {
                return Err(ArtifactError::ShapeMismatch {
                    context: "churn scaler vs model".to_string(),
                    expected: self.model.n_features(),
                    found: width,
                });
            }
        }
        Ok(())
    }
}
