//! The FeaturePipeline runs preprocessing steps in order.
//!
//! This module provides the FeaturePipeline struct that chains
//! multiple steps together using the builder pattern.

use crate::error::Result;
use crate::frame::FeatureFrame;
use crate::traits::FeatureStep;

/// Chains multiple steps together into a preprocessing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FeaturePipeline::new()
///     .add_step(NumericCoercion::new(["monthly_spend", "travel_score"]))
///     .add_step(CategoricalEncoding::new("plan_type", "Prepaid", encoder, policy));
///
/// let mut frame = FeatureFrame::new(&record);
/// pipeline.apply(&mut frame)?;
/// ```
pub struct FeaturePipeline {
    steps: Vec<Box<dyn FeatureStep>>,
}

impl FeaturePipeline {
    /// Create a new empty FeaturePipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the pipeline (builder pattern).
    pub fn add_step(mut self, step: impl FeatureStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Apply all steps in sequence; the first failing step aborts.
    pub fn apply(&self, frame: &mut FeatureFrame<'_>) -> Result<()> {
        for step in &self.steps {
            tracing::debug!(
                "Applying step: {} (columns before: {})",
                step.name(),
                frame.len()
            );
            step.apply(frame)?;
            tracing::debug!(
                "Step applied: {} (columns after: {})",
                step.name(),
                frame.len()
            );
        }
        Ok(())
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new()
    }
}
