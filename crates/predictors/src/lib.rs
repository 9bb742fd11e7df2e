//! # Predictors Crate
//!
//! The two served models, each wrapping its artifacts and preprocessing:
//!
//! ### RecommendationPredictor
//! Preprocess -> classifier pipeline -> target label decode.
//! Returns the recommended plan and the probability of that plan.
//!
//! ### ChurnPredictor
//! Preprocess -> scaler -> forest -> probability of class 1 -> risk
//! bucket (`Low` / `Medium` / `High`) and a 0/1 prediction.
//!
//! Both are immutable once built and are shared across request handlers
//! behind an `Arc`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use predictors::{ChurnPredictor, RecommendationPredictor};
//! use pipeline::UnknownCategoryPolicy;
//!
//! let recommender = RecommendationPredictor::new(bundle, UnknownCategoryPolicy::FirstClass)?;
//! let rec = recommender.predict(&record)?;
//! println!("{} ({})", rec.recommendation, rec.confidence_score);
//! ```

pub mod churn;
pub mod error;
pub mod recommender;
pub mod types;

pub use churn::ChurnPredictor;
pub use error::{PredictionError, Result};
pub use recommender::RecommendationPredictor;
pub use types::{
    ChurnAssessment, Recommendation, RiskCategory, CHURN_DECISION_THRESHOLD,
    HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD,
};
