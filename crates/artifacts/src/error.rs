//! Error types for the artifacts crate.
//!
//! Loading errors (missing files, bad JSON, inconsistent shapes) and the
//! few runtime errors a fitted artifact can raise when it is handed a
//! vector it cannot score share one enum, so callers only match once.

use thiserror::Error;

/// Errors that can occur while loading or applying a fitted artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// File could not be found
    #[error("Artifact file not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File was readable but is not a valid artifact document
    #[error("Failed to decode {path}: {source}")]
    DecodeError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact decoded but violates a structural rule
    #[error("Invalid artifact: {0}")]
    Invalid(String),

    /// Two widths that must agree do not
    #[error("Shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    /// A feature vector carried NaN or infinity
    #[error("Input contains non-finite value {value} at position {index}")]
    NonFiniteInput { index: usize, value: f64 },

    /// A class code has no label in the encoder vocabulary
    #[error("Class code {code} is out of range for an encoder with {len} classes")]
    UnknownClassCode { code: i64, len: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ArtifactError>;
