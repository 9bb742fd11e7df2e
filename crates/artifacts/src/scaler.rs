//! Fitted standard scaler.

use crate::error::{ArtifactError, Result};
use serde::{Deserialize, Serialize};

/// Per-column standardization `(x - mean) / scale`.
///
/// Either half may be absent: a scaler fitted without centering has no
/// `mean`, one fitted without scaling has no `scale`. A zero `scale`
/// entry marks a constant training column and divides by 1.0 instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StandardScalerRepr")]
pub struct StandardScaler {
    mean: Option<Vec<f64>>,
    scale: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct StandardScalerRepr {
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
}

impl TryFrom<StandardScalerRepr> for StandardScaler {
    type Error = ArtifactError;

    fn try_from(repr: StandardScalerRepr) -> Result<Self> {
        Self::new(repr.mean, repr.scale)
    }
}

impl StandardScaler {
    pub fn new(mean: Option<Vec<f64>>, scale: Option<Vec<f64>>) -> Result<Self> {
        if let (Some(m), Some(s)) = (&mean, &scale) {
            if m.len() != s.len() {
                return Err(ArtifactError::ShapeMismatch {
                    context: "scaler mean/scale".to_string(),
                    expected: m.len(),
                    found: s.len(),
                });
            }
        }
        if mean.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ArtifactError::Invalid(
                "scaler mean contains a non-finite value".to_string(),
            ));
        }
        let scale = match scale {
            Some(values) => {
                if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(ArtifactError::Invalid(
                        "scaler scale must be finite and non-negative".to_string(),
                    ));
                }
                Some(
                    values
                        .into_iter()
                        .map(|v| if v == 0.0 { 1.0 } else { v })
                        .collect(),
                )
            }
            None => None,
        };
        Ok(Self { mean, scale })
    }

    /// Number of columns the scaler was fitted on, if it records one.
    pub fn n_features(&self) -> Option<usize> {
        self.mean
            .as_ref()
            .or(self.scale.as_ref())
            .map(|values| values.len())
    }

    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        if let Some(expected) = self.n_features() {
            if x.len() != expected {
                return Err(ArtifactError::ShapeMismatch {
                    context: "scaler input".to_string(),
                    expected,
                    found: x.len(),
                });
            }
        }

        let scaled = x
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let centered = match &self.mean {
                    Some(mean) => value - mean[i],
                    None => *value,
                };
                match &self.scale {
                    Some(scale) => centered / scale[i],
                    None => centered,
                }
            })
            .collect();
        Ok(scaled)
    }
}
