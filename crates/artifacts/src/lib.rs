//! # Artifacts Crate
//!
//! Fitted model artifacts for the telco ML service and the code that loads
//! them.
//!
//! ## Main Components
//!
//! - **encoder**: `LabelEncoder`, category string <-> training code
//! - **scaler**: `StandardScaler`, per-column standardization
//! - **forest**: `TreeEnsemble` random-forest classifier and the
//!   `ClassifierPipeline` that scales before classifying
//! - **bundle**: the recommendation bundle and churn artifact set
//! - **loader**: reading and validating artifact files
//! - **error**: error types
//!
//! ## Example Usage
//!
//! ```ignore
//! use artifacts::{load_recommendation_bundle, ChurnArtifactPaths, load_churn_artifacts};
//! use std::path::Path;
//!
//! let bundle = load_recommendation_bundle(Path::new("models/telco_pipeline_model.json"))?;
//! let churn = load_churn_artifacts(&ChurnArtifactPaths::in_dir(Path::new("models")))?;
//!
//! let (class, confidence) = bundle.model.predict(&vector)?;
//! ```

pub mod bundle;
pub mod encoder;
pub mod error;
pub mod forest;
pub mod loader;
pub mod scaler;

pub use bundle::{ChurnArtifacts, RecommendationBundle};
pub use encoder::LabelEncoder;
pub use error::{ArtifactError, Result};
pub use forest::{ClassifierPipeline, DecisionTree, Node, TreeEnsemble};
pub use loader::{
    load_churn_artifacts, load_recommendation_bundle, ChurnArtifactPaths, CHURN_ENCODERS_FILE,
    CHURN_MODEL_FILE, CHURN_SCALER_FILE, RECOMMENDATION_BUNDLE_FILE,
};
pub use scaler::StandardScaler;
