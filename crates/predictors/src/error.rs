//! Errors produced while scoring a record.

use artifacts::ArtifactError;
use pipeline::PreprocessError;
use thiserror::Error;

/// Errors that can occur during a prediction
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("Model rejected input: {0}")]
    Model(#[from] ArtifactError),

    #[error("Failed to decode predicted class: {0}")]
    LabelDecode(#[source] ArtifactError),

    #[error("Churn model needs at least 2 classes, found {0}")]
    MissingChurnClass(usize),

    /// Model width differs from the vector preprocessing builds
    #[error("{model} model expects {expected} features but preprocessing produces {found}")]
    FeatureWidth {
        model: &'static str,
        expected: usize,
        found: usize,
    },
}

impl PredictionError {
    /// True when the request itself was unacceptable rather than the
    /// artifacts or the model failing.
    pub fn is_input_error(&self) -> bool {
        // A missing encoder is an artifact gap, so it stays a server fault
        matches!(
            self,
            PredictionError::Preprocess(PreprocessError::UnknownCategory { .. })
        )
    }
}

/// Fails when `preprocessor` cannot build a vector of `n_features` values.
pub(crate) fn check_width(
    model: &'static str,
    n_features: usize,
    preprocessor: &pipeline::Preprocessor,
) -> Result<()> {
    match preprocessor.width() {
        Some(found) if found != n_features => Err(PredictionError::FeatureWidth {
            model,
            expected: n_features,
            found,
        }),
        _ => Ok(()),
    }
}

pub type Result<T> = std::result::Result<T, PredictionError>;
