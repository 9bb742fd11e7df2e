//! Shared application state.
//!
//! Artifacts are loaded once at startup. Each predictor is optional: a
//! model whose artifacts failed to load stays `None` and its endpoints
//! report it, unless the config asks for strict startup.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use artifacts::{load_churn_artifacts, load_recommendation_bundle};
use predictors::{ChurnPredictor, RecommendationPredictor};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone, Default)]
pub struct AppState {
    recommender: Option<Arc<RecommendationPredictor>>,
    churn: Option<Arc<ChurnPredictor>>,
}

impl AppState {
    pub fn new(recommender: Option<RecommendationPredictor>, churn: Option<ChurnPredictor>) -> Self {
        Self {
            recommender: recommender.map(Arc::new),
            churn: churn.map(Arc::new),
        }
    }

    /// Load both models as described by `config`.
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let policy = config.unknown_category;

        let bundle_path = config.recommendation_bundle_path();
        let recommender = load_recommendation_bundle(&bundle_path)
            .with_context(|| format!("Failed to load recommendation bundle {}", bundle_path.display()))
            .and_then(|bundle| {
                RecommendationPredictor::new(bundle, policy)
                    .context("Recommendation bundle does not fit its preprocessing")
            });

        let churn = load_churn_artifacts(&config.churn_paths())
            .context("Failed to load churn artifacts")
            .and_then(|artifacts| {
                ChurnPredictor::new(artifacts, policy)
                    .context("Churn model does not fit its preprocessing")
            });

        let recommender = Self::accept(recommender, config.strict_startup, "Recommendation model")?;
        let churn = Self::accept(churn, config.strict_startup, "Churn model")?;

        info!(
            "Models ready (recommendation: {}, churn: {}, unknown categories: {})",
            recommender.is_some(),
            churn.is_some(),
            policy
        );
        Ok(Self::new(recommender, churn))
    }

    fn accept<T>(loaded: Result<T>, strict: bool, what: &str) -> Result<Option<T>> {
        match loaded {
            Ok(value) => {
                info!("{} loaded successfully", what);
                Ok(Some(value))
            }
            Err(e) if strict => Err(e),
            Err(e) => {
                error!("{} unavailable: {:#}", what, e);
                Ok(None)
            }
        }
    }

    pub fn recommender(&self) -> Option<Arc<RecommendationPredictor>> {
        self.recommender.clone()
    }

    pub fn churn(&self) -> Option<Arc<ChurnPredictor>> {
        self.churn.clone()
    }
}
