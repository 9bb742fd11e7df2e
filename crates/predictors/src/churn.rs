//! Churn risk predictor.
//!
//! Preprocess, scale with the separately fitted scaler, take the forest's
//! probability for class index 1 and bucket it into a risk category.

use crate::error::{check_width, PredictionError, Result};
use crate::types::ChurnAssessment;
use artifacts::{ChurnArtifacts, StandardScaler, TreeEnsemble};
use pipeline::{churn_preprocessor, Preprocessor, RawRecord, UnknownCategoryPolicy};
use tracing::debug;

pub struct ChurnPredictor {
    preprocessor: Preprocessor,
    scaler: StandardScaler,
    model: TreeEnsemble,
}

impl ChurnPredictor {
    /// Fails unless the forest takes exactly the fixed churn columns.
    pub fn new(artifacts: ChurnArtifacts, policy: UnknownCategoryPolicy) -> Result<Self> {
        let ChurnArtifacts {
            model,
            scaler,
            encoders,
        } = artifacts;

        let preprocessor = churn_preprocessor(encoders, policy);
        check_width("Churn", model.n_features(), &preprocessor)?;

        Ok(Self {
            preprocessor,
            scaler,
            model,
        })
    }

    /// Churn risk for one customer record.
    pub fn predict(&self, record: &RawRecord) -> Result<ChurnAssessment> {
        let vector = self.preprocessor.transform(record)?;
        let scaled = self.scaler.transform(&vector)?;
        let proba = self.model.predict_proba(&scaled)?;

        let churn_probability = *proba
            .get(1)
            .ok_or(PredictionError::MissingChurnClass(proba.len()))?;

        let assessment = ChurnAssessment::from_probability(churn_probability);
        debug!(
            "Churn probability {:.4} ({})",
            assessment.risk_score, assessment.risk_category
        );
        Ok(assessment)
    }

    /// Named, unscaled feature vector for a record.
    pub fn explain(&self, record: &RawRecord) -> Result<Vec<(String, f64)>> {
        Ok(self.preprocessor.transform_named(record)?)
    }

    pub fn model(&self) -> &TreeEnsemble {
        &self.model
    }
}
