//! Errors raised while turning a raw record into a feature vector.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreprocessError {
    /// Category outside the encoder vocabulary under the `reject` policy
    #[error("Unknown value '{value}' for categorical column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// No fitted encoder for a categorical column under the `reject` policy
    #[error("No label encoder available for column '{column}'")]
    MissingEncoder { column: String },
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
