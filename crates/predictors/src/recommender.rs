//! Plan recommendation predictor.
//!
//! Wraps the recommendation bundle: preprocessing built from the bundle's
//! encoders and feature order, the classifier pipeline (which scales
//! internally), and the target encoder that turns a class code back into
//! a plan name.

use crate::error::{check_width, PredictionError, Result};
use crate::types::Recommendation;
use artifacts::{ClassifierPipeline, LabelEncoder, RecommendationBundle};
use pipeline::{recommendation_preprocessor, Preprocessor, RawRecord, UnknownCategoryPolicy};
use rayon::prelude::*;
use tracing::debug;

pub struct RecommendationPredictor {
    preprocessor: Preprocessor,
    model: ClassifierPipeline,
    le_target: Option<LabelEncoder>,
}

impl RecommendationPredictor {
    /// Fails when the model width differs from the feature order, which
    /// is the bundle's `features` list or the default recommender order.
    pub fn new(bundle: RecommendationBundle, policy: UnknownCategoryPolicy) -> Result<Self> {
        let RecommendationBundle {
            model,
            le_plan,
            le_device,
            le_target,
            features,
        } = bundle;

        let preprocessor = recommendation_preprocessor(le_plan, le_device, features, policy);
        check_width("Recommendation", model.n_features(), &preprocessor)?;

        Ok(Self {
            preprocessor,
            model,
            le_target,
        })
    }

    /// Recommend a plan for one customer record.
    ///
    /// The confidence is the probability of the winning class. Without a
    /// target encoder the class code itself is returned as the label.
    pub fn predict(&self, record: &RawRecord) -> Result<Recommendation> {
        let vector = self.preprocessor.transform(record)?;
        let (class, confidence) = self.model.predict(&vector)?;

        let label = match &self.le_target {
            Some(encoder) => encoder
                .inverse_transform(class)
                .map_err(PredictionError::LabelDecode)?
                .to_string(),
            None => class.to_string(),
        };

        debug!("Recommended {} (class {}, confidence {:.4})", label, class, confidence);
        Ok(Recommendation::new(label, confidence))
    }

    /// Score many records in parallel. Results keep the input order.
    pub fn predict_batch(&self, records: &[RawRecord]) -> Vec<Result<Recommendation>> {
        records.par_iter().map(|record| self.predict(record)).collect()
    }

    /// Named feature vector for a record, in model order.
    pub fn explain(&self, record: &RawRecord) -> Result<Vec<(String, f64)>> {
        Ok(self.preprocessor.transform_named(record)?)
    }

    pub fn feature_order(&self) -> Option<&[String]> {
        self.preprocessor.order()
    }

    pub fn model(&self) -> &ClassifierPipeline {
        &self.model
    }

    pub fn target_labels(&self) -> Option<&[String]> {
        self.le_target.as_ref().map(LabelEncoder::classes)
    }
}
