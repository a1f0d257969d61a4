//! Random forest regression model deserialized from a JSON artifact.
//!
//! The artifact is an array of binary decision trees. Each tree stores its
//! nodes in a flat vector with the root at index 0; branches hold child
//! indices into that vector. Prediction averages the per-tree leaf values.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::model::Predictor;

/// One node of a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Internal split: go left when `features[feature] <= threshold`.
    Branch {
        /// Index of the feature compared at this split.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Node index of the left child.
        left: usize,
        /// Node index of the right child.
        right: usize,
    },
    /// Terminal node carrying the regression output.
    Leaf {
        /// Predicted value for rows reaching this leaf.
        value: f64,
    },
}

/// A single regression tree, nodes flattened with the root at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Flat node storage; branch children index into this vector.
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk the tree for one feature row, returning the reached leaf value.
    ///
    /// Traversal visits at most `nodes.len()` nodes; a longer walk means the
    /// artifact encodes a cycle and is rejected.
    fn predict_row(&self, tree_index: usize, features: &[f64]) -> Result<f64, PredictError> {
        let mut node_index = 0;

        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(node_index).ok_or_else(|| {
                PredictError::MalformedTree {
                    tree: tree_index,
                    reason: format!("node index {} out of range", node_index),
                }
            })?;

            match *node {
                Node::Leaf { value } => return Ok(value),
                Node::Branch {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(feature).copied().ok_or_else(|| {
                        PredictError::MalformedTree {
                            tree: tree_index,
                            reason: format!("feature index {} out of range", feature),
                        }
                    })?;

                    node_index = if value <= threshold { left } else { right };
                }
            }
        }

        Err(PredictError::MalformedTree {
            tree: tree_index,
            reason: "traversal did not reach a leaf".to_string(),
        })
    }
}

/// Random forest regressor: an ensemble of trees averaged at prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Input width the forest was trained on.
    pub n_features: usize,
    /// The ensemble.
    pub trees: Vec<Tree>,
}

impl Predictor for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != self.n_features {
            return Err(PredictError::FeatureMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }

        if self.trees.is_empty() {
            return Err(PredictError::EmptyModel);
        }

        let mut sum = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree.predict_row(i, features)?;
        }

        Ok(sum / self.trees.len() as f64)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
