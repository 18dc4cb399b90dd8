//! Random forest inference
//!
//! The forest is exported from the fitted model as plain node arrays, one set
//! per tree. Inference walks each tree from the root, sending a sample left
//! when `x[feature] <= threshold`, and takes the argmax of the leaf's class
//! weights. The forest prediction is the majority vote over trees.
//!
//! All structural checks happen in `from_json`, so `predict` cannot index out
//! of bounds or loop: child indices always point forward.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Artifact format identifier
pub const FOREST_FORMAT: &str = "random_forest.v1";

/// Child index marking a leaf
const LEAF: i64 = -1;

/// Single decision tree in array form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights; only leaf rows are read
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn check(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err("node arrays differ in length".to_string());
        }

        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("node {node} has exactly one child"));
                }
                if self.value[node].len() != n_classes {
                    return Err(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        self.value[node].len()
                    ));
                }
                continue;
            }

            for child in [left, right] {
                let in_range = usize::try_from(child)
                    .map(|c| c > node && c < nodes)
                    .unwrap_or(false);
                if !in_range {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }

            let feature_ok = usize::try_from(self.feature[node])
                .map(|f| f < n_features)
                .unwrap_or(false);
            if !feature_ok {
                return Err(format!(
                    "node {node} splits on feature {} of {n_features}",
                    self.feature[node]
                ));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {node} has a NaN threshold"));
            }
        }

        Ok(())
    }

    /// Class index chosen by this tree
    fn predict_class(&self, sample: &[f64]) -> usize {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return argmax(&self.value[node]);
            }
            // Indices were range-checked at load
            let feature = self.feature[node] as usize;
            node = if sample[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

/// Index of the largest weight; ties go to the lowest index
fn argmax(weights: &[f64]) -> usize {
    let mut best = 0;
    for (i, w) in weights.iter().enumerate().skip(1) {
        if *w > weights[best] {
            best = i;
        }
    }
    best
}

/// Ensemble of decision trees with majority voting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub format: String,
    pub n_features: usize,
    pub n_classes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Parse and structurally check a forest artifact
    pub fn from_json(json: &str) -> Result<Self, AssessmentError> {
        let forest: RandomForest = serde_json::from_str(json)
            .map_err(|e| AssessmentError::Configuration(format!("invalid forest artifact: {e}")))?;
        forest.check()?;
        Ok(forest)
    }

    /// Structural checks; `from_json` runs them, and so does every
    /// `ForestClassifier` built from a forest constructed another way
    pub(crate) fn check(&self) -> Result<(), AssessmentError> {
        let fail = |msg: String| Err(AssessmentError::Configuration(msg));

        if self.format != FOREST_FORMAT {
            return fail(format!(
                "unsupported forest format '{}', expected '{FOREST_FORMAT}'",
                self.format
            ));
        }
        if self.n_features == 0 || self.n_classes == 0 {
            return fail("forest declares no features or no classes".to_string());
        }
        if self.trees.is_empty() {
            return fail("forest has no trees".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return fail(format!(
                    "forest lists {} feature names for {} features",
                    names.len(),
                    self.n_features
                ));
            }
        }
        if let Some(importances) = &self.feature_importances {
            if importances.len() != self.n_features {
                return fail(format!(
                    "forest lists {} importances for {} features",
                    importances.len(),
                    self.n_features
                ));
            }
        }

        for (i, tree) in self.trees.iter().enumerate() {
            if let Err(msg) = tree.check(self.n_features, self.n_classes) {
                return fail(format!("tree {i}: {msg}"));
            }
        }

        Ok(())
    }

    /// Vote counts per class for one sample
    pub fn votes(&self, sample: &[f64]) -> Result<Vec<usize>, AssessmentError> {
        if sample.len() != self.n_features {
            return Err(AssessmentError::Configuration(format!(
                "sample has {} features, forest expects {}",
                sample.len(),
                self.n_features
            )));
        }

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict_class(sample)] += 1;
        }
        Ok(votes)
    }

    /// Class index with the most votes; ties go to the lowest index
    pub fn predict(&self, sample: &[f64]) -> Result<usize, AssessmentError> {
        let votes = self.votes(sample)?;
        let mut best = 0;
        for (i, v) in votes.iter().enumerate().skip(1) {
            if *v > votes[best] {
                best = i;
            }
        }
        Ok(best)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}
