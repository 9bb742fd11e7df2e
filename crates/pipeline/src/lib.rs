//! Preprocessing pipeline for the telco models.
//!
//! This crate provides:
//! - FeatureFrame, the single-row working table steps read and write
//! - FeatureStep trait and implementations (coercion, engineered
//!   features, label encoding)
//! - FeaturePipeline for composing steps
//! - Preprocessor builders for the recommendation and churn models
//!
//! ## Architecture
//! A raw JSON record flows through the steps in order:
//! 1. NumericCoercion turns numeric fields into numbers (0.0 on failure)
//! 2. DerivedFeatures adds engineered columns (recommender only)
//! 3. CategoricalEncoding replaces categories with training codes
//! 4. The preprocessor selects columns in training order
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{recommendation_preprocessor, UnknownCategoryPolicy};
//!
//! let pre = recommendation_preprocessor(
//!     bundle.le_plan.clone(),
//!     bundle.le_device.clone(),
//!     bundle.features.clone(),
//!     UnknownCategoryPolicy::FirstClass,
//! );
//! let vector = pre.transform(&record)?;
//! ```

pub mod coerce;
pub mod error;
pub mod feature_pipeline;
pub mod features;
pub mod frame;
pub mod steps;
pub mod traits;

// Re-export main types
pub use coerce::{category_text, coerce_numeric, float_text};
pub use error::PreprocessError;
pub use feature_pipeline::FeaturePipeline;
pub use features::{
    churn_preprocessor, recommendation_preprocessor, Preprocessor, CHURN_FEATURE_ORDER,
    CHURN_NUMERIC_COLUMNS, DEVICE_BRAND, PLAN_TYPE, RECOMMENDATION_FEATURE_ORDER,
    RECOMMENDATION_NUMERIC_COLUMNS,
};
pub use frame::{FeatureFrame, RawRecord};
pub use steps::UnknownCategoryPolicy;
pub use traits::FeatureStep;
