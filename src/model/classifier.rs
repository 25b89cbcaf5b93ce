//! Fitted classifiers
//!
//! Three model families can be loaded from JSON:
//! - `linear`: one weight row per class, argmax of `W·x + b`
//! - `nearest_centroid`: class of the closest centroid (Euclidean)
//! - `random_forest`: decision trees in array layout, class probabilities
//!   averaged across trees
//!
//! Every family stores `classes`, the integer label for each output index.

use serde::Deserialize;

use crate::error::{ArtifactError, InferenceError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Binary models may store a single weight row; a positive score then
    /// selects `classes[1]`.
    Linear {
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },

    NearestCentroid {
        classes: Vec<i64>,
        centroids: Vec<Vec<f64>>,
    },

    RandomForest {
        classes: Vec<i64>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
}

/// Node arrays of one fitted tree. Node 0 is the root; a node whose left
/// child is `LEAF` is a leaf. Samples with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions), one entry per class.
    pub value: Vec<Vec<f64>>,
}

const LEAF: i64 = -1;

/// Index of the largest score; ties go to the lowest index.
fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            // NaN never wins
            Some((_, top)) if !(score > top) => {}
            None if score.is_nan() => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn uniform_rows(rows: &[Vec<f64>], what: &str) -> Result<usize, ArtifactError> {
    let width = rows
        .first()
        .map(|r| r.len())
        .ok_or_else(|| ArtifactError::shape("classifier", format!("{} is empty", what)))?;
    if width == 0 || rows.iter().any(|r| r.len() != width) {
        return Err(ArtifactError::shape(
            "classifier",
            format!("{} rows must be non-empty and of equal length", what),
        ));
    }
    Ok(width)
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays differ in length".to_string());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if self.value[node].len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class weights, expected {}",
                        node,
                        self.value[node].len(),
                        n_classes
                    ));
                }
                continue;
            }
            // Children always follow their parent in depth-first layout, which
            // also rules out cycles.
            let in_range = |child: i64| child > node as i64 && (child as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {} has out-of-range children", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
        }
        Ok(())
    }

    /// Class weight vector of the leaf reached by `x`, normalized to sum to one.
    fn leaf_distribution(&self, tree: usize, x: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let malformed = |node: usize| InferenceError::MalformedTree { tree, node };
        let mut node = 0usize;

        // Bounded walk: a valid path visits each node at most once.
        for _ in 0..self.node_count() {
            let left = *self.children_left.get(node).ok_or_else(|| malformed(node))?;
            if left == LEAF {
                let weights = self.value.get(node).ok_or_else(|| malformed(node))?;
                let total: f64 = weights.iter().sum();
                return Ok(if total > 0.0 {
                    weights.iter().map(|w| w / total).collect()
                } else {
                    weights.clone()
                });
            }
            let split = self.feature.get(node).ok_or_else(|| malformed(node))?;
            let feature = usize::try_from(*split).map_err(|_| malformed(node))?;
            let value = *x.get(feature).ok_or_else(|| malformed(node))?;
            let threshold = *self.threshold.get(node).ok_or_else(|| malformed(node))?;
            let next = if value <= threshold {
                left
            } else {
                *self.children_right.get(node).ok_or_else(|| malformed(node))?
            };
            node = usize::try_from(next).map_err(|_| malformed(node))?;
        }
        Err(malformed(node))
    }
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Linear { .. } => "linear",
            Classifier::NearestCentroid { .. } => "nearest_centroid",
            Classifier::RandomForest { .. } => "random_forest",
        }
    }

    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::Linear { classes, .. }
            | Classifier::NearestCentroid { classes, .. }
            | Classifier::RandomForest { classes, .. } => classes,
        }
    }

    /// Number of features the classifier was fitted on (0 if unfitted).
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::Linear { coef, .. } => coef.first().map_or(0, |r| r.len()),
            Classifier::NearestCentroid { centroids, .. } => centroids.first().map_or(0, |r| r.len()),
            Classifier::RandomForest { n_features, .. } => *n_features,
        }
    }

    /// Structural checks run once at load time so that `predict` only has to
    /// guard against input arity.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n_classes = self.classes().len();
        if n_classes == 0 {
            return Err(ArtifactError::shape("classifier", "classes is empty"));
        }

        match self {
            Classifier::Linear { coef, intercept, .. } => {
                uniform_rows(coef, "coef")?;
                let binary = n_classes == 2 && coef.len() == 1;
                if coef.len() != n_classes && !binary {
                    return Err(ArtifactError::shape(
                        "classifier",
                        format!("coef has {} rows for {} classes", coef.len(), n_classes),
                    ));
                }
                if intercept.len() != coef.len() {
                    return Err(ArtifactError::shape(
                        "classifier",
                        format!("intercept has {} values for {} coef rows", intercept.len(), coef.len()),
                    ));
                }
            }
            Classifier::NearestCentroid { centroids, .. } => {
                uniform_rows(centroids, "centroids")?;
                if centroids.len() != n_classes {
                    return Err(ArtifactError::shape(
                        "classifier",
                        format!("{} centroids for {} classes", centroids.len(), n_classes),
                    ));
                }
            }
            Classifier::RandomForest { n_features, trees, .. } => {
                if *n_features == 0 {
                    return Err(ArtifactError::shape("classifier", "n_features must be positive"));
                }
                if trees.is_empty() {
                    return Err(ArtifactError::shape("classifier", "forest has no trees"));
                }
                for (idx, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features, n_classes).map_err(|msg| {
                        ArtifactError::shape("classifier", format!("tree {}: {}", idx, msg))
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Predict the class label for one scaled sample.
    pub fn predict(&self, x: &[f64]) -> Result<i64, InferenceError> {
        let expected = self.n_features();
        if x.len() != expected {
            return Err(InferenceError::ClassifierShape {
                expected,
                actual: x.len(),
            });
        }

        let index = match self {
            Classifier::Linear {
                classes,
                coef,
                intercept,
            } => {
                let scores: Vec<f64> = coef
                    .iter()
                    .zip(intercept)
                    .map(|(w, b)| dot(w, x) + b)
                    .collect();
                if classes.len() == 2 && scores.len() == 1 {
                    Some(usize::from(scores[0] > 0.0))
                } else {
                    argmax(&scores)
                }
            }
            Classifier::NearestCentroid { centroids, .. } => {
                let negated: Vec<f64> = centroids
                    .iter()
                    .map(|c| -squared_distance(c, x))
                    .collect();
                argmax(&negated)
            }
            Classifier::RandomForest { classes, trees, .. } => {
                let mut totals = vec![0.0; classes.len()];
                for (idx, tree) in trees.iter().enumerate() {
                    let dist = tree.leaf_distribution(idx, x)?;
                    for (total, p) in totals.iter_mut().zip(dist) {
                        *total += p;
                    }
                }
                argmax(&totals)
            }
        };

        index
            .and_then(|i| self.classes().get(i).copied())
            .ok_or(InferenceError::NoDecision)
    }
}
