//! Decision tree

use florascope_core::ModelError;
use serde::{Deserialize, Serialize};

/// A binary decision tree stored as a flat node array, root at index 0
///
/// Samples with `x[feature] <= threshold` go to `left`. Children always sit
/// after their parent in the array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
}

/// One node of a [`DecisionTree`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Training samples per class that reached this leaf
        counts: Vec<f64>,
    },
}

impl DecisionTree {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::malformed("decision tree has no nodes"));
        }
        if self.n_features == 0 {
            return Err(ModelError::malformed("decision tree has zero features"));
        }

        let mut n_classes = None;
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(ModelError::malformed(format!(
                            "node {} splits on feature {} of {}",
                            i, feature, self.n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::malformed(format!(
                            "node {} has a non-finite threshold",
                            i
                        )));
                    }
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(ModelError::malformed(format!(
                                "node {} points to invalid child {}",
                                i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { counts } => {
                    if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
                        return Err(ModelError::malformed(format!(
                            "leaf {} has a negative or non-finite count",
                            i
                        )));
                    }
                    if counts.iter().sum::<f64>() <= 0.0 {
                        return Err(ModelError::malformed(format!("leaf {} is empty", i)));
                    }
                    match n_classes {
                        None => n_classes = Some(counts.len()),
                        Some(n) if n != counts.len() => {
                            return Err(ModelError::malformed(format!(
                                "leaf {} has {} classes, expected {}",
                                i,
                                counts.len(),
                                n
                            )));
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        if n_classes.is_none() {
            return Err(ModelError::malformed("decision tree has no leaves"));
        }
        Ok(())
    }

    pub(crate) fn n_features(&self) -> usize {
        self.n_features
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.nodes
            .iter()
            .find_map(|node| match node {
                TreeNode::Leaf { counts } => Some(counts.len()),
                TreeNode::Split { .. } => None,
            })
            .unwrap_or(0)
    }

    /// Class counts of the leaf that `x` lands in
    pub(crate) fn leaf_counts(&self, x: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { counts } => return counts,
            }
        }
    }

    pub(crate) fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let counts = self.leaf_counts(x);
        let total: f64 = counts.iter().sum();
        counts.iter().map(|c| c / total).collect()
    }
}
