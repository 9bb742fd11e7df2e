//! Server configuration.
//!
//! Plain data; the `cli` crate fills it from command-line flags and
//! environment variables.

use artifacts::{
    ChurnArtifactPaths, CHURN_ENCODERS_FILE, CHURN_MODEL_FILE, CHURN_SCALER_FILE,
    RECOMMENDATION_BUNDLE_FILE,
};
use pipeline::UnknownCategoryPolicy;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub addr: SocketAddr,
    /// Directory artifact file names are resolved against
    pub model_dir: PathBuf,
    /// Artifact file names; absolute paths ignore `model_dir`
    pub recommendation_bundle: PathBuf,
    pub churn_model: PathBuf,
    pub churn_scaler: PathBuf,
    pub churn_encoders: PathBuf,
    pub unknown_category: UnknownCategoryPolicy,
    /// Fail startup when any artifact fails to load instead of serving
    /// "not loaded" errors for that model
    pub strict_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            model_dir: PathBuf::from("."),
            recommendation_bundle: PathBuf::from(RECOMMENDATION_BUNDLE_FILE),
            churn_model: PathBuf::from(CHURN_MODEL_FILE),
            churn_scaler: PathBuf::from(CHURN_SCALER_FILE),
            churn_encoders: PathBuf::from(CHURN_ENCODERS_FILE),
            unknown_category: UnknownCategoryPolicy::default(),
            strict_startup: false,
        }
    }
}

impl ServerConfig {
    pub fn with_model_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Self::default()
        }
    }

    pub fn recommendation_bundle_path(&self) -> PathBuf {
        self.resolve(&self.recommendation_bundle)
    }

    pub fn churn_paths(&self) -> ChurnArtifactPaths {
        ChurnArtifactPaths {
            model: self.resolve(&self.churn_model),
            scaler: self.resolve(&self.churn_scaler),
            encoders: self.resolve(&self.churn_encoders),
        }
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        self.model_dir.join(file)
    }
}
