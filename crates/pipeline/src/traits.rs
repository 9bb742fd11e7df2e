//! Core trait for the preprocessing pipeline.
//!
//! This module defines the FeatureStep trait that allows composable
//! preprocessing stages to be applied to a single record.

use crate::error::Result;
use crate::frame::FeatureFrame;

/// One stage of preprocessing.
///
/// Steps read the raw record and previously computed columns through the
/// frame and write their output columns back into it.
///
/// ## Design Note
/// - `Send + Sync` lets a built pipeline be shared across request handlers
/// - Steps are immutable after construction; all per-request state lives
///   in the frame
pub trait FeatureStep: Send + Sync {
    /// Returns the name of this step (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this step to the frame.
    fn apply(&self, frame: &mut FeatureFrame<'_>) -> Result<()>;
}
