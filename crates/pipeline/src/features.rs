//! Preprocessors for the two served models.
//!
//! A `Preprocessor` is a built `FeaturePipeline` plus the column order the
//! model was trained with. It turns one raw record into the exact vector
//! the model expects.

use crate::error::Result;
use crate::feature_pipeline::FeaturePipeline;
use crate::frame::{FeatureFrame, RawRecord};
use crate::steps::derived::{SPEND_PER_CALL_UNIT, VIDEO_DATA_INTENSITY};
use crate::steps::{CategoricalEncoding, DerivedFeatures, NumericCoercion, UnknownCategoryPolicy};
use artifacts::LabelEncoder;
use std::collections::HashMap;

pub const PLAN_TYPE: &str = "plan_type";
pub const DEVICE_BRAND: &str = "device_brand";

/// Numeric payload fields the recommender reads.
pub const RECOMMENDATION_NUMERIC_COLUMNS: [&str; 8] = [
    "avg_data_usage_gb",
    "pct_video_usage",
    "avg_call_duration",
    "sms_freq",
    "monthly_spend",
    "topup_freq",
    "travel_score",
    "complaint_count",
];

/// Recommender column order when the bundle does not record one: the
/// order the preprocessing steps write their columns in.
pub const RECOMMENDATION_FEATURE_ORDER: [&str; 12] = [
    "avg_data_usage_gb",
    "pct_video_usage",
    "avg_call_duration",
    "sms_freq",
    "monthly_spend",
    "topup_freq",
    "travel_score",
    "complaint_count",
    VIDEO_DATA_INTENSITY,
    SPEND_PER_CALL_UNIT,
    PLAN_TYPE,
    DEVICE_BRAND,
];

/// Numeric payload fields the churn model reads.
pub const CHURN_NUMERIC_COLUMNS: [&str; 4] = [
    "pct_video_usage",
    "monthly_spend",
    "travel_score",
    "complaint_count",
];

/// Training column order of the churn model.
pub const CHURN_FEATURE_ORDER: [&str; 6] = [
    PLAN_TYPE,
    DEVICE_BRAND,
    "pct_video_usage",
    "monthly_spend",
    "travel_score",
    "complaint_count",
];

/// Steps plus output order.
pub struct Preprocessor {
    pipeline: FeaturePipeline,
    order: Option<Vec<String>>,
}

impl Preprocessor {
    /// `order: None` emits columns in the order the steps wrote them.
    pub fn new(pipeline: FeaturePipeline, order: Option<Vec<String>>) -> Self {
        Self { pipeline, order }
    }

    pub fn order(&self) -> Option<&[String]> {
        self.order.as_deref()
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    /// Length of every vector `transform` returns, when the order is fixed.
    pub fn width(&self) -> Option<usize> {
        self.order.as_ref().map(Vec::len)
    }

    /// Feature vector for one record.
    pub fn transform(&self, record: &RawRecord) -> Result<Vec<f64>> {
        let mut frame = FeatureFrame::new(record);
        self.pipeline.apply(&mut frame)?;
        Ok(match &self.order {
            Some(order) => frame.select(order),
            None => frame.values(),
        })
    }

    /// Same as `transform`, keeping column names alongside the values.
    pub fn transform_named(&self, record: &RawRecord) -> Result<Vec<(String, f64)>> {
        let mut frame = FeatureFrame::new(record);
        self.pipeline.apply(&mut frame)?;
        Ok(match &self.order {
            Some(order) => order
                .iter()
                .cloned()
                .zip(frame.select(order))
                .collect(),
            None => frame.into_columns(),
        })
    }
}

/// Preprocessing for the plan recommender.
///
/// Coerces the numeric fields, adds the engineered features, encodes plan
/// type (default `Prepaid`) and device brand (default `Other`), then
/// reorders to `features` when the bundle declares it and to
/// [`RECOMMENDATION_FEATURE_ORDER`] otherwise.
pub fn recommendation_preprocessor(
    le_plan: Option<LabelEncoder>,
    le_device: Option<LabelEncoder>,
    features: Option<Vec<String>>,
    policy: UnknownCategoryPolicy,
) -> Preprocessor {
    let pipeline = FeaturePipeline::new()
        .add_step(NumericCoercion::new(RECOMMENDATION_NUMERIC_COLUMNS))
        .add_step(DerivedFeatures)
        .add_step(CategoricalEncoding::new(PLAN_TYPE, "Prepaid", le_plan, policy))
        .add_step(CategoricalEncoding::new(DEVICE_BRAND, "Other", le_device, policy));
    let order = features
        .unwrap_or_else(|| RECOMMENDATION_FEATURE_ORDER.iter().map(|s| s.to_string()).collect());
    Preprocessor::new(pipeline, Some(order))
}

/// Preprocessing for the churn model, before scaling.
///
/// Encoders are looked up by column name; a missing value stringifies to
/// `Unknown`. Output follows [`CHURN_FEATURE_ORDER`].
pub fn churn_preprocessor(
    mut encoders: HashMap<String, LabelEncoder>,
    policy: UnknownCategoryPolicy,
) -> Preprocessor {
    let pipeline = FeaturePipeline::new()
        .add_step(NumericCoercion::new(CHURN_NUMERIC_COLUMNS))
        .add_step(CategoricalEncoding::new(
            PLAN_TYPE,
            "Unknown",
            encoders.remove(PLAN_TYPE),
            policy,
        ))
        .add_step(CategoricalEncoding::new(
            DEVICE_BRAND,
            "Unknown",
            encoders.remove(DEVICE_BRAND),
            policy,
        ));
    let order = CHURN_FEATURE_ORDER.iter().map(|s| s.to_string()).collect();
    Preprocessor::new(pipeline, Some(order))
}
