//! Stratified data splitting and evaluation helpers.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::classifier::types::Label;

/// Class-balanced per-sample weights: `n / (n_classes * n_in_class)`.
///
/// Complaint corpora skew heavily toward non-disasters; without reweighting
/// both models systematically under-predict the rarer class.
pub fn balanced_sample_weights(labels: &[Label]) -> Vec<f64> {
    let mut counts: HashMap<Label, usize> = HashMap::new();
    for label in labels {
        *counts.entry(*label).or_insert(0) += 1;
    }

    let n = labels.len() as f64;
    let n_classes = counts.len() as f64;
    labels
        .iter()
        .map(|label| n / (n_classes * counts[label] as f64))
        .collect()
}

/// Indices grouped by label, each group shuffled with the seeded RNG.
fn shuffled_class_groups(labels: &[Label], seed: u64) -> Vec<Vec<usize>> {
    let mut groups: HashMap<Label, Vec<usize>> = HashMap::new();
    for (i, label) in labels.iter().enumerate() {
        groups.entry(*label).or_default().push(i);
    }

    // Stable iteration order so the split is reproducible.
    let mut ordered: Vec<(Label, Vec<usize>)> = groups.into_iter().collect();
    ordered.sort_by_key(|(label, _)| label.index());

    let mut rng = StdRng::seed_from_u64(seed);
    ordered
        .into_iter()
        .map(|(_, mut indices)| {
            indices.shuffle(&mut rng);
            indices
        })
        .collect()
}

/// Stratified hold-out split preserving label proportions.
///
/// Returns `(train_indices, holdout_indices)`. Each class contributes
/// `round(n_class * holdout_fraction)` examples, at least one when the class
/// has two or more members, and never all of them.
pub fn stratified_split(
    labels: &[Label],
    holdout_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut train = Vec::new();
    let mut holdout = Vec::new();

    for indices in shuffled_class_groups(labels, seed) {
        let n_class = indices.len();
        let mut h = (n_class as f64 * holdout_fraction).round() as usize;
        if n_class >= 2 {
            h = h.clamp(1, n_class - 1);
        } else {
            h = 0;
        }

        holdout.extend_from_slice(&indices[..h]);
        train.extend_from_slice(&indices[h..]);
    }

    train.sort_unstable();
    holdout.sort_unstable();
    (train, holdout)
}

/// Stratified k-fold partition of the given indices.
///
/// Returns `None` when any class has fewer members than `k`, in which case
/// cross-validation is skipped rather than degenerating.
pub fn stratified_folds(labels: &[Label], k: usize, seed: u64) -> Option<Vec<Vec<usize>>> {
    let groups = shuffled_class_groups(labels, seed);
    if k < 2 || groups.iter().any(|g| g.len() < k) {
        return None;
    }

    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];
    for indices in groups {
        for (position, index) in indices.into_iter().enumerate() {
            folds[position % k].push(index);
        }
    }
    for fold in &mut folds {
        fold.sort_unstable();
    }
    Some(folds)
}

/// Fraction of matching labels.
pub fn accuracy(predicted: &[Label], truth: &[Label]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(a, b)| a == b)
        .count();
    hits as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(verified: usize, not_verified: usize) -> Vec<Label> {
        let mut labels = vec![Label::Verified; verified];
        labels.extend(vec![Label::NotVerified; not_verified]);
        labels
    }

    #[test]
    fn test_balanced_weights_counter_imbalance() {
        let weights = balanced_sample_weights(&labels(1, 9));
        // Minority sample weight: 10 / (2 * 1) = 5; majority: 10 / (2 * 9).
        assert!((weights[0] - 5.0).abs() < 1e-9);
        assert!((weights[9] - 10.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_stratified_split_preserves_both_classes() {
        let labels = labels(20, 20);
        let (train, holdout) = stratified_split(&labels, 0.05, 42);

        assert_eq!(train.len() + holdout.len(), 40);
        assert_eq!(holdout.len(), 2); // one per class at 5%
        let holdout_labels: Vec<Label> = holdout.iter().map(|&i| labels[i]).collect();
        assert!(holdout_labels.contains(&Label::Verified));
        assert!(holdout_labels.contains(&Label::NotVerified));
    }

    #[test]
    fn test_stratified_split_is_deterministic() {
        let labels = labels(30, 10);
        assert_eq!(
            stratified_split(&labels, 0.05, 7),
            stratified_split(&labels, 0.05, 7)
        );
    }

    #[test]
    fn test_folds_cover_everything_once() {
        let labels = labels(15, 10);
        let folds = stratified_folds(&labels, 5, 42).unwrap();

        assert_eq!(folds.len(), 5);
        let mut all: Vec<usize> = folds.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_folds_skipped_for_tiny_classes() {
        assert!(stratified_folds(&labels(3, 20), 5, 42).is_none());
    }

    #[test]
    fn test_accuracy() {
        let truth = labels(2, 2);
        let predicted = vec![
            Label::Verified,
            Label::NotVerified,
            Label::NotVerified,
            Label::NotVerified,
        ];
        assert!((accuracy(&predicted, &truth) - 0.75).abs() < 1e-9);
    }
}
