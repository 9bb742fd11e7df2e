//! Tree-ensemble (random forest) classifier.
//!
//! A forest is stored as a list of flat node arrays, the layout fitted
//! decision trees are usually exported in. Node 0 is the root; a split
//! sends `x[feature] <= threshold` to `left` and everything else to
//! `right`. Every leaf holds a per-class distribution which is
//! normalized at construction, so `predict_proba` is the plain average of
//! the leaves the input lands in.
//!
//! ## Invariants checked at construction
//! - Child indices point forward (`child > parent`) and stay in bounds,
//!   so traversal always terminates without a visited set.
//! - Split features are `< n_features`.
//! - Leaves have one entry per class and positive total mass.

use crate::error::{ArtifactError, Result};
use crate::scaler::StandardScaler;
use serde::{Deserialize, Serialize};

/// One node of a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(value: Vec<f64>) -> Self {
        Node::Leaf { value }
    }
}

/// A single fitted decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = node {
                let child_depth = depths[i] + 1;
                depths[*left] = child_depth;
                depths[*right] = child_depth;
                max_depth = max_depth.max(child_depth);
            }
        }
        max_depth
    }

    fn validate_and_normalize(&mut self, tree_idx: usize, n_features: usize, n_classes: usize) -> Result<()> {
        let len = self.nodes.len();
        if len == 0 {
            return Err(ArtifactError::Invalid(format!("tree {} has no nodes", tree_idx)));
        }

        for (i, node) in self.nodes.iter_mut().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} node {} splits on feature {} but the model has {} features",
                            tree_idx, i, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} node {} has a NaN threshold",
                            tree_idx, i
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(ArtifactError::Invalid(format!(
                                "tree {} node {} has child {} outside ({}, {})",
                                tree_idx, i, child, i, len
                            )));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ArtifactError::ShapeMismatch {
                            context: format!("tree {} leaf {}", tree_idx, i),
                            expected: n_classes,
                            found: value.len(),
                        });
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} leaf {} has a negative or non-finite weight",
                            tree_idx, i
                        )));
                    }
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} leaf {} has zero mass",
                            tree_idx, i
                        )));
                    }
                    value.iter_mut().for_each(|v| *v /= total);
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

/// Random-forest classifier over a fixed-width numeric vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TreeEnsembleRepr")]
pub struct TreeEnsemble {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

#[derive(Deserialize)]
struct TreeEnsembleRepr {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl TryFrom<TreeEnsembleRepr> for TreeEnsemble {
    type Error = ArtifactError;

    fn try_from(repr: TreeEnsembleRepr) -> Result<Self> {
        Self::new(repr.n_features, repr.classes, repr.trees)
    }
}

impl TreeEnsemble {
    pub fn new(n_features: usize, classes: Vec<i64>, mut trees: Vec<DecisionTree>) -> Result<Self> {
        if n_features == 0 {
            return Err(ArtifactError::Invalid("forest declares zero features".to_string()));
        }
        if classes.is_empty() {
            return Err(ArtifactError::Invalid("forest declares no classes".to_string()));
        }
        if trees.is_empty() {
            return Err(ArtifactError::Invalid("forest has no trees".to_string()));
        }
        for (i, tree) in trees.iter_mut().enumerate() {
            tree.validate_and_normalize(i, n_features, classes.len())?;
        }
        Ok(Self {
            n_features,
            classes,
            trees,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Class probabilities, aligned with `classes()`.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_input(x)?;

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_for(x)) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    /// Most probable class and its probability. Ties go to the lower index.
    pub fn predict(&self, x: &[f64]) -> Result<(i64, f64)> {
        let proba = self.predict_proba(x)?;
        let (best, confidence) = argmax(&proba);
        Ok((self.classes[best], confidence))
    }

    fn check_input(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.n_features {
            return Err(ArtifactError::ShapeMismatch {
                context: "forest input".to_string(),
                expected: self.n_features,
                found: x.len(),
            });
        }
        if let Some((index, value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ArtifactError::NonFiniteInput {
                index,
                value: *value,
            });
        }
        Ok(())
    }
}

fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}

/// Classifier that standardizes its input before the forest sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ClassifierPipelineRepr")]
pub struct ClassifierPipeline {
    scaler: Option<StandardScaler>,
    classifier: TreeEnsemble,
}

#[derive(Deserialize)]
struct ClassifierPipelineRepr {
    #[serde(default)]
    scaler: Option<StandardScaler>,
    classifier: TreeEnsemble,
}

impl TryFrom<ClassifierPipelineRepr> for ClassifierPipeline {
    type Error = ArtifactError;

    fn try_from(repr: ClassifierPipelineRepr) -> Result<Self> {
        Self::new(repr.scaler, repr.classifier)
    }
}

impl ClassifierPipeline {
    pub fn new(scaler: Option<StandardScaler>, classifier: TreeEnsemble) -> Result<Self> {
        if let Some(width) = scaler.as_ref().and_then(StandardScaler::n_features) {
            if width != classifier.n_features() {
                return Err(ArtifactError::ShapeMismatch {
                    context: "pipeline scaler vs classifier".to_string(),
                    expected: classifier.n_features(),
                    found: width,
                });
            }
        }
        Ok(Self { scaler, classifier })
    }

    pub fn n_features(&self) -> usize {
        self.classifier.n_features()
    }

    pub fn classes(&self) -> &[i64] {
        self.classifier.classes()
    }

    pub fn classifier(&self) -> &TreeEnsemble {
        &self.classifier
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        match &self.scaler {
            Some(scaler) => self.classifier.predict_proba(&scaler.transform(x)?),
            None => self.classifier.predict_proba(x),
        }
    }

    pub fn predict(&self, x: &[f64]) -> Result<(i64, f64)> {
        match &self.scaler {
            Some(scaler) => self.classifier.predict(&scaler.transform(x)?),
            None => self.classifier.predict(x),
        }
    }
}
