//! Dual-classifier ensemble service.
//!
//! [`DisasterClassifier`] owns the three trained artifacts (vectorizer,
//! forest, SVM) and is the only object call sites hold: constructed once,
//! then shared read-only. There is no ambient global state and no per-call
//! artifact reloading. Concurrent `predict` calls need no locking because
//! the artifacts are immutable after construction.

use serde::{Deserialize, Serialize};

use crate::analysis::normalized_document;
use crate::classifier::forest::{ForestConfig, RandomForest};
use crate::classifier::split::{
    accuracy, balanced_sample_weights, stratified_folds, stratified_split,
};
use crate::classifier::svm::{KernelSvm, SvmConfig};
use crate::classifier::types::{
    CLASS_COUNT, Label, LabeledComplaint, ModelBreakdown, Prediction, TrainingReport,
};
use crate::error::{Result, TriageError};
use crate::features::{self, HANDCRAFTED_FEATURE_COUNT};
use crate::vectorizer::{TfIdfVectorizer, VectorizerConfig};

/// Full training configuration. Hashed into the artifact-set version tag by
/// the model store, so two runs with different configurations can never be
/// mixed silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// TF-IDF vocabulary construction.
    pub vectorizer: VectorizerConfig,
    /// Tree-ensemble hyperparameters.
    pub forest: ForestConfig,
    /// Kernel-model hyperparameters.
    pub svm: SvmConfig,
    /// Fraction held out for evaluation (stratified).
    pub holdout_fraction: f64,
    /// Cross-validation fold count.
    pub cv_folds: usize,
    /// Seed for the split and folds.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            forest: ForestConfig::default(),
            svm: SvmConfig::default(),
            holdout_fraction: 0.05,
            cv_folds: 5,
            seed: 42,
        }
    }
}

/// The trained ensemble: vectorizer plus both models, versioned as a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisasterClassifier {
    vectorizer: TfIdfVectorizer,
    forest: RandomForest,
    svm: KernelSvm,
}

impl DisasterClassifier {
    /// Train the full ensemble on labeled complaints.
    ///
    /// Fits the vectorizer on every normalized text, builds the combined
    /// feature rows, splits 95/5 stratified, and fits both models on the
    /// training subset with class-balanced sample weights. The report
    /// carries held-out and cross-validated accuracy as diagnostics; they
    /// never gate success.
    pub fn train(
        examples: &[LabeledComplaint],
        config: &TrainingConfig,
    ) -> Result<(Self, TrainingReport)> {
        if examples.is_empty() {
            return Err(TriageError::training("training corpus is empty"));
        }
        let labels: Vec<Label> = examples.iter().map(|e| e.label).collect();
        if !labels.contains(&Label::Verified) || !labels.contains(&Label::NotVerified) {
            return Err(TriageError::training(
                "training corpus must contain both verified and not_verified examples",
            ));
        }

        let documents: Vec<String> = examples
            .iter()
            .map(|e| normalized_document(&e.text))
            .collect();
        let mut vectorizer = TfIdfVectorizer::new(config.vectorizer.clone());
        vectorizer.fit(&documents)?;

        let rows: Vec<Vec<f64>> = examples
            .iter()
            .zip(&documents)
            .map(|(example, document)| combined_row(&vectorizer, document, &example.text))
            .collect::<Result<_>>()?;

        let (train_indices, holdout_indices) =
            stratified_split(&labels, config.holdout_fraction, config.seed);

        let (forest, svm) = fit_pair(config, &rows, &labels, &train_indices)?;

        let holdout_truth: Vec<Label> = holdout_indices.iter().map(|&i| labels[i]).collect();
        let forest_holdout: Vec<Label> = holdout_indices
            .iter()
            .map(|&i| forest.predict(&rows[i]))
            .collect::<Result<_>>()?;
        let svm_holdout: Vec<Label> = holdout_indices
            .iter()
            .map(|&i| svm.predict(&rows[i]))
            .collect::<Result<_>>()?;

        let (forest_cv, svm_cv) = cross_validate(config, &rows, &labels, &train_indices)?;

        let report = TrainingReport {
            train_size: train_indices.len(),
            holdout_size: holdout_indices.len(),
            forest_holdout_accuracy: accuracy(&forest_holdout, &holdout_truth),
            svm_holdout_accuracy: accuracy(&svm_holdout, &holdout_truth),
            forest_cv_accuracy: forest_cv,
            svm_cv_accuracy: svm_cv,
            feature_width: vectorizer.vocabulary_size() + HANDCRAFTED_FEATURE_COUNT,
        };

        let classifier = Self {
            vectorizer,
            forest,
            svm,
        };
        Ok((classifier, report))
    }

    /// Reassemble a classifier from individually loaded artifacts,
    /// verifying that all three agree on the combined feature width.
    pub fn from_artifacts(
        vectorizer: TfIdfVectorizer,
        forest: RandomForest,
        svm: KernelSvm,
    ) -> Result<Self> {
        if !vectorizer.is_fitted() {
            return Err(TriageError::ModelsNotLoaded);
        }
        let expected = vectorizer.vocabulary_size() + HANDCRAFTED_FEATURE_COUNT;
        for found in [forest.feature_width(), svm.feature_width()] {
            if found != expected {
                return Err(TriageError::ArtifactMismatch { expected, found });
            }
        }
        Ok(Self {
            vectorizer,
            forest,
            svm,
        })
    }

    /// Classify one complaint.
    ///
    /// Both models produce a class distribution over the combined feature
    /// vector; the ensemble averages the two distributions unweighted and
    /// takes the argmax. Exact ties resolve to `not_verified` (see
    /// [`Label::argmax`]). The breakdown reports each model's own verdict,
    /// which may disagree with the ensemble label.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let document = normalized_document(text);
        let row = combined_row(&self.vectorizer, &document, text)?;

        let forest_probabilities = self.forest.predict_proba(&row)?;
        let svm_probabilities = self.svm.predict_proba(&row)?;

        let mut averaged = [0.0; CLASS_COUNT];
        for i in 0..CLASS_COUNT {
            averaged[i] = (forest_probabilities[i] + svm_probabilities[i]) / 2.0;
        }

        let (label, confidence) = Label::argmax(&averaged);
        let (forest_label, forest_confidence) = Label::argmax(&forest_probabilities);
        let (svm_label, svm_confidence) = Label::argmax(&svm_probabilities);

        Ok(Prediction {
            label,
            confidence,
            breakdown: ModelBreakdown {
                forest_label,
                forest_confidence,
                svm_label,
                svm_confidence,
            },
        })
    }

    /// Combined feature width all artifacts agree on.
    pub fn feature_width(&self) -> usize {
        self.vectorizer.vocabulary_size() + HANDCRAFTED_FEATURE_COUNT
    }

    /// Borrow the three artifacts (for persistence).
    pub fn artifacts(&self) -> (&TfIdfVectorizer, &RandomForest, &KernelSvm) {
        (&self.vectorizer, &self.forest, &self.svm)
    }
}

/// TF-IDF vector for the normalized document, with the five handcrafted
/// features (computed from raw text) appended positionally.
fn combined_row(vectorizer: &TfIdfVectorizer, document: &str, raw_text: &str) -> Result<Vec<f64>> {
    let mut row = vectorizer.transform(document)?;
    row.extend_from_slice(&features::extract(raw_text).to_vec());
    Ok(row)
}

/// Fit both models on the selected subset with balanced weights.
fn fit_pair(
    config: &TrainingConfig,
    rows: &[Vec<f64>],
    labels: &[Label],
    indices: &[usize],
) -> Result<(RandomForest, KernelSvm)> {
    let subset_rows: Vec<Vec<f64>> = indices.iter().map(|&i| rows[i].clone()).collect();
    let subset_labels: Vec<Label> = indices.iter().map(|&i| labels[i]).collect();
    let weights = balanced_sample_weights(&subset_labels);

    let forest = RandomForest::fit(
        config.forest.clone(),
        &subset_rows,
        &subset_labels,
        &weights,
    )?;
    let svm = KernelSvm::fit(config.svm.clone(), &subset_rows, &subset_labels, &weights)?;
    Ok((forest, svm))
}

/// Mean k-fold accuracy for both models over the training subset, or `None`
/// when the subset is too small to fold.
fn cross_validate(
    config: &TrainingConfig,
    rows: &[Vec<f64>],
    labels: &[Label],
    train_indices: &[usize],
) -> Result<(Option<f64>, Option<f64>)> {
    let train_labels: Vec<Label> = train_indices.iter().map(|&i| labels[i]).collect();
    let Some(folds) = stratified_folds(&train_labels, config.cv_folds, config.seed) else {
        return Ok((None, None));
    };

    let mut forest_scores = Vec::with_capacity(folds.len());
    let mut svm_scores = Vec::with_capacity(folds.len());

    for fold in &folds {
        // Fold positions index into train_indices; map back to corpus rows.
        let eval: Vec<usize> = fold.iter().map(|&p| train_indices[p]).collect();
        let fit: Vec<usize> = train_indices
            .iter()
            .copied()
            .filter(|i| !eval.contains(i))
            .collect();

        let (forest, svm) = fit_pair(config, rows, labels, &fit)?;
        let truth: Vec<Label> = eval.iter().map(|&i| labels[i]).collect();
        let forest_predictions: Vec<Label> = eval
            .iter()
            .map(|&i| forest.predict(&rows[i]))
            .collect::<Result<_>>()?;
        let svm_predictions: Vec<Label> = eval
            .iter()
            .map(|&i| svm.predict(&rows[i]))
            .collect::<Result<_>>()?;

        forest_scores.push(accuracy(&forest_predictions, &truth));
        svm_scores.push(accuracy(&svm_predictions, &truth));
    }

    let mean = |scores: &[f64]| scores.iter().sum::<f64>() / scores.len() as f64;
    Ok((Some(mean(&forest_scores)), Some(mean(&svm_scores))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_corpus;

    #[test]
    fn test_train_and_predict_on_sample_corpus() {
        let (classifier, report) =
            DisasterClassifier::train(&sample_corpus(), &TrainingConfig::default()).unwrap();

        assert!(report.train_size > report.holdout_size);
        assert_eq!(
            report.feature_width,
            classifier.feature_width()
        );

        let prediction = classifier
            .predict("Severe flooding in downtown area, need immediate evacuation assistance")
            .unwrap();
        assert_eq!(prediction.label, Label::Verified);
        assert!(prediction.confidence > 0.5);
        assert!(prediction.confidence <= 1.0);
    }

    #[test]
    fn test_predict_non_disaster() {
        let (classifier, _) =
            DisasterClassifier::train(&sample_corpus(), &TrainingConfig::default()).unwrap();

        let prediction = classifier
            .predict("Street light not working on main road")
            .unwrap();
        assert_eq!(prediction.label, Label::NotVerified);
    }

    #[test]
    fn test_confidence_always_in_unit_interval() {
        let (classifier, _) =
            DisasterClassifier::train(&sample_corpus(), &TrainingConfig::default()).unwrap();

        for text in ["", "xyzzy", "!!!", "water water water water"] {
            let prediction = classifier.predict(text).unwrap();
            assert!((0.0..=1.0).contains(&prediction.confidence));
            assert!((0.0..=1.0).contains(&prediction.breakdown.forest_confidence));
            assert!((0.0..=1.0).contains(&prediction.breakdown.svm_confidence));
        }
    }

    #[test]
    fn test_training_rejects_empty_corpus() {
        let result = DisasterClassifier::train(&[], &TrainingConfig::default());
        assert!(matches!(result, Err(TriageError::Training(_))));
    }

    #[test]
    fn test_training_rejects_single_label_corpus() {
        let examples = vec![
            LabeledComplaint::new("flooding downtown", Label::Verified),
            LabeledComplaint::new("earthquake damage", Label::Verified),
        ];
        let result = DisasterClassifier::train(&examples, &TrainingConfig::default());
        assert!(matches!(result, Err(TriageError::Training(_))));
    }

    #[test]
    fn test_artifact_reassembly_checks_width() {
        let (classifier, _) =
            DisasterClassifier::train(&sample_corpus(), &TrainingConfig::default()).unwrap();
        let (vectorizer, forest, svm) = classifier.artifacts();

        // Matching artifacts reassemble fine.
        assert!(
            DisasterClassifier::from_artifacts(
                vectorizer.clone(),
                forest.clone(),
                svm.clone()
            )
            .is_ok()
        );

        // A vectorizer from a different run (different width) must not pair
        // with these models.
        let mut small = TfIdfVectorizer::new(VectorizerConfig {
            max_features: 3,
            ..VectorizerConfig::default()
        });
        small
            .fit(&["flood water".to_string(), "street light".to_string()])
            .unwrap();
        let result = DisasterClassifier::from_artifacts(small, forest.clone(), svm.clone());
        assert!(matches!(result, Err(TriageError::ArtifactMismatch { .. })));
    }
}
