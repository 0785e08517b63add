//! Bagged decision-tree classifier (random forest).
//!
//! Each tree is grown on a bootstrap resample of the training subset, with a
//! random sqrt-sized feature subset considered at every split. Class
//! imbalance is countered by per-sample weights supplied by the caller
//! (balanced reweighting); the weights flow through both the Gini impurity
//! and the leaf class distributions. Probabilities are the mean of the leaf
//! distributions across trees.
//!
//! Trees are grown in parallel with rayon; prediction is read-only and
//! lock-free.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::types::{CLASS_COUNT, Label};
use crate::error::{Result, TriageError};

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of bagged trees.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum weighted sample count to attempt a split.
    pub min_samples_split: usize,
    /// Seed for bootstrap and feature sampling.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// One node of a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    /// Terminal node holding a weighted class distribution.
    Leaf { distribution: [f64; CLASS_COUNT] },
    /// Binary split: `feature <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn descend(&self, sample: &[f64]) -> &[f64; CLASS_COUNT] {
        match self {
            TreeNode::Leaf { distribution } => distribution,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] <= *threshold {
                    left.descend(sample)
                } else {
                    right.descend(sample)
                }
            }
        }
    }
}

/// Trained bagged decision-tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<TreeNode>,
    n_features: usize,
}

impl RandomForest {
    /// Fit a forest on dense feature rows.
    ///
    /// `sample_weights` must have one entry per row; the ensemble layer
    /// passes class-balanced weights here.
    pub fn fit(
        config: ForestConfig,
        rows: &[Vec<f64>],
        labels: &[Label],
        sample_weights: &[f64],
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(TriageError::training("cannot fit forest on empty data"));
        }
        if rows.len() != labels.len() || rows.len() != sample_weights.len() {
            return Err(TriageError::training(
                "rows, labels and weights must have equal lengths",
            ));
        }
        let n_features = rows[0].len();

        let trees: Vec<TreeNode> = (0..config.n_trees)
            .into_par_iter()
            .map(|tree_index| {
                // Per-tree RNG keyed off the configured seed, so training is
                // reproducible regardless of rayon scheduling.
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_index as u64));
                let indices: Vec<usize> = (0..rows.len())
                    .map(|_| rng.random_range(0..rows.len()))
                    .collect();
                grow_tree(&config, rows, labels, sample_weights, &indices, 0, &mut rng)
            })
            .collect();

        Ok(Self {
            config,
            trees,
            n_features,
        })
    }

    /// Mean class distribution across all trees.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<[f64; CLASS_COUNT]> {
        if sample.len() != self.n_features {
            return Err(TriageError::ArtifactMismatch {
                expected: self.n_features,
                found: sample.len(),
            });
        }

        let mut probabilities = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            let leaf = tree.descend(sample);
            for (p, l) in probabilities.iter_mut().zip(leaf.iter()) {
                *p += l;
            }
        }
        for p in &mut probabilities {
            *p /= self.trees.len() as f64;
        }
        Ok(probabilities)
    }

    /// Top-1 label.
    pub fn predict(&self, sample: &[f64]) -> Result<Label> {
        Ok(Label::argmax(&self.predict_proba(sample)?).0)
    }

    /// Feature width the forest was trained against.
    pub fn feature_width(&self) -> usize {
        self.n_features
    }

    /// Number of trees in the ensemble.
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

/// Weighted class counts for a set of sample indices.
fn class_weights(
    labels: &[Label],
    sample_weights: &[f64],
    indices: &[usize],
) -> [f64; CLASS_COUNT] {
    let mut counts = [0.0; CLASS_COUNT];
    for &i in indices {
        counts[labels[i].index()] += sample_weights[i];
    }
    counts
}

fn gini(counts: &[f64; CLASS_COUNT]) -> f64 {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts
        .iter()
        .map(|c| {
            let p = c / total;
            p * p
        })
        .sum::<f64>()
}

fn leaf(counts: [f64; CLASS_COUNT]) -> TreeNode {
    let total: f64 = counts.iter().sum();
    let distribution = if total > 0.0 {
        [counts[0] / total, counts[1] / total]
    } else {
        [0.5; CLASS_COUNT]
    };
    TreeNode::Leaf { distribution }
}

#[allow(clippy::too_many_arguments)]
fn grow_tree(
    config: &ForestConfig,
    rows: &[Vec<f64>],
    labels: &[Label],
    sample_weights: &[f64],
    indices: &[usize],
    depth: usize,
    rng: &mut StdRng,
) -> TreeNode {
    let counts = class_weights(labels, sample_weights, indices);

    let pure = counts.iter().filter(|c| **c > 0.0).count() <= 1;
    if pure || depth >= config.max_depth || indices.len() < config.min_samples_split {
        return leaf(counts);
    }

    let n_features = rows[0].len();
    let n_candidates = (n_features as f64).sqrt().ceil() as usize;
    let candidate_features = rand::seq::index::sample(rng, n_features, n_candidates.min(n_features));

    let parent_impurity = gini(&counts);
    let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, impurity gain)

    for feature in candidate_features {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_by(|&a, &b| {
            rows[a][feature]
                .partial_cmp(&rows[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total = counts;
        let total_weight: f64 = total.iter().sum();
        let mut left = [0.0; CLASS_COUNT];

        for window in ordered.windows(2) {
            let (i, j) = (window[0], window[1]);
            left[labels[i].index()] += sample_weights[i];

            let (vi, vj) = (rows[i][feature], rows[j][feature]);
            if vi == vj {
                continue;
            }

            let right = [total[0] - left[0], total[1] - left[1]];
            let left_weight: f64 = left.iter().sum();
            let right_weight = total_weight - left_weight;
            if left_weight <= 0.0 || right_weight <= 0.0 {
                continue;
            }

            let weighted_impurity = (left_weight * gini(&left) + right_weight * gini(&right))
                / total_weight;
            let gain = parent_impurity - weighted_impurity;
            if gain > best.map_or(1e-12, |(_, _, g)| g) {
                best = Some((feature, (vi + vj) / 2.0, gain));
            }
        }
    }

    let Some((feature, threshold, _)) = best else {
        return leaf(counts);
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| rows[i][feature] <= threshold);

    if left_indices.is_empty() || right_indices.is_empty() {
        return leaf(counts);
    }

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(grow_tree(
            config,
            rows,
            labels,
            sample_weights,
            &left_indices,
            depth + 1,
            rng,
        )),
        right: Box::new(grow_tree(
            config,
            rows,
            labels,
            sample_weights,
            &right_indices,
            depth + 1,
            rng,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<Vec<f64>>, Vec<Label>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        // Verified cluster around (1, 0), not-verified around (0, 1).
        for i in 0..20 {
            let jitter = (i as f64) * 0.01;
            rows.push(vec![1.0 + jitter, 0.0 + jitter]);
            labels.push(Label::Verified);
            rows.push(vec![0.0 + jitter, 1.0 + jitter]);
            labels.push(Label::NotVerified);
        }
        (rows, labels)
    }

    #[test]
    fn test_forest_learns_separable_data() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let forest = RandomForest::fit(ForestConfig::default(), &rows, &labels, &weights).unwrap();

        assert_eq!(forest.predict(&[1.1, 0.1]).unwrap(), Label::Verified);
        assert_eq!(forest.predict(&[0.1, 1.1]).unwrap(), Label::NotVerified);
    }

    #[test]
    fn test_forest_probabilities_sum_to_one() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let forest = RandomForest::fit(ForestConfig::default(), &rows, &labels, &weights).unwrap();

        let probabilities = forest.predict_proba(&[0.5, 0.5]).unwrap();
        let sum: f64 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_forest_is_deterministic_for_a_seed() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let a = RandomForest::fit(ForestConfig::default(), &rows, &labels, &weights).unwrap();
        let b = RandomForest::fit(ForestConfig::default(), &rows, &labels, &weights).unwrap();

        let pa = a.predict_proba(&[0.7, 0.4]).unwrap();
        let pb = b.predict_proba(&[0.7, 0.4]).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_forest_rejects_wrong_width() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let forest = RandomForest::fit(ForestConfig::default(), &rows, &labels, &weights).unwrap();

        match forest.predict_proba(&[1.0, 2.0, 3.0]) {
            Err(TriageError::ArtifactMismatch { expected, found }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected ArtifactMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_forest_empty_data_is_an_error() {
        let result = RandomForest::fit(ForestConfig::default(), &[], &[], &[]);
        assert!(result.is_err());
    }
}
