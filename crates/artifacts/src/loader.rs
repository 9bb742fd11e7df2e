//! Loading artifacts from disk.
//!
//! Artifacts are JSON documents. Each file is decoded, validated, and
//! returned as an immutable value; nothing here is reloaded after
//! startup.

use crate::bundle::{ChurnArtifacts, RecommendationBundle};
use crate::encoder::LabelEncoder;
use crate::error::{ArtifactError, Result};
use crate::forest::TreeEnsemble;
use crate::scaler::StandardScaler;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const RECOMMENDATION_BUNDLE_FILE: &str = "telco_pipeline_model.json";
pub const CHURN_MODEL_FILE: &str = "rf_churn_risk_model.json";
pub const CHURN_SCALER_FILE: &str = "scaler.json";
pub const CHURN_ENCODERS_FILE: &str = "label_encoders.json";

/// Locations of the three churn artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChurnArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoders: PathBuf,
}

impl ChurnArtifactPaths {
    /// Default file names inside `model_dir`.
    pub fn in_dir(model_dir: &Path) -> Self {
        Self {
            model: model_dir.join(CHURN_MODEL_FILE),
            scaler: model_dir.join(CHURN_SCALER_FILE),
            encoders: model_dir.join(CHURN_ENCODERS_FILE),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ArtifactError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    debug!("Reading artifact {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| ArtifactError::DecodeError {
        path: path.display().to_string(),
        source,
    })
}

/// Load and validate the recommendation bundle.
pub fn load_recommendation_bundle(path: &Path) -> Result<RecommendationBundle> {
    let bundle: RecommendationBundle = read_json(path)?;
    bundle.validate()?;

    info!(
        "Loaded recommendation bundle from {} ({} trees, {} classes)",
        path.display(),
        bundle.model.classifier().trees().len(),
        bundle.model.classes().len()
    );
    if let Some(features) = &bundle.features {
        info!("Expecting columns: {:?}", features);
    }
    Ok(bundle)
}

/// Load the churn forest, scaler and encoders.
///
/// The three files are independent, so they are decoded in parallel
/// with nested `rayon::join`.
pub fn load_churn_artifacts(paths: &ChurnArtifactPaths) -> Result<ChurnArtifacts> {
    let ((model, scaler), encoders) = rayon::join(
        || {
            rayon::join(
                || read_json::<TreeEnsemble>(&paths.model),
                || read_json::<StandardScaler>(&paths.scaler),
            )
        },
        || read_json::<HashMap<String, LabelEncoder>>(&paths.encoders),
    );

    let artifacts = ChurnArtifacts {
        model: model?,
        scaler: scaler?,
        encoders: encoders?,
    };
    artifacts.validate()?;

    info!(
        "Loaded churn artifacts ({} trees, encoders for {:?})",
        artifacts.model.trees().len(),
        artifacts.encoders.keys().collect::<Vec<_>>()
    );
    Ok(artifacts)
}
