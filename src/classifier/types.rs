//! Common types for disaster classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verification label produced by the ensemble.
///
/// `NotVerified` never means "rejected": downstream routing sends it to
/// manual review. Spam is a separate, logically prior verdict produced by
/// the spam gate and never by the models (see [`crate::spam`]).
///
/// The discriminant order is the probability-vector order used throughout
/// the classifier: index 0 = `NotVerified`, index 1 = `Verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Complaint classified as non-disaster; routed to manual review.
    NotVerified,
    /// Complaint classified as disaster-related.
    Verified,
}

/// Number of classes the models distinguish.
pub const CLASS_COUNT: usize = 2;

impl Label {
    /// Class index in probability vectors.
    pub fn index(self) -> usize {
        match self {
            Label::NotVerified => 0,
            Label::Verified => 1,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Self {
        if index == 1 {
            Label::Verified
        } else {
            Label::NotVerified
        }
    }

    /// Wire/CLI representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::NotVerified => "not_verified",
            Label::Verified => "verified",
        }
    }

    /// Pick the label with the higher probability from a two-class
    /// distribution. Exact ties resolve to `NotVerified`: alphabetically
    /// first, and also the conservative routing default.
    pub fn argmax(probabilities: &[f64; CLASS_COUNT]) -> (Self, f64) {
        if probabilities[Label::Verified.index()] > probabilities[Label::NotVerified.index()] {
            (Label::Verified, probabilities[Label::Verified.index()])
        } else {
            (Label::NotVerified, probabilities[Label::NotVerified.index()])
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledComplaint {
    /// Raw complaint text.
    pub text: String,
    /// Ground-truth label.
    pub label: Label,
}

impl LabeledComplaint {
    /// Convenience constructor.
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Per-model detail attached to every prediction.
///
/// Each model reports its *own* top-1 label and probability, independent of
/// the ensemble decision. When neither model is near-unanimous, averaging
/// can produce an ensemble label that disagrees with both — rare, but a
/// legitimate outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelBreakdown {
    /// Tree-ensemble model's own top-1 label.
    pub forest_label: Label,
    /// Tree-ensemble model's own top-1 probability.
    pub forest_confidence: f64,
    /// Kernel model's own top-1 label.
    pub svm_label: Label,
    /// Kernel model's own top-1 probability.
    pub svm_confidence: f64,
}

/// Result of one classification call. Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Ensemble label (argmax of the averaged distribution).
    pub label: Label,
    /// Averaged probability of the winning class, in [0, 1].
    pub confidence: f64,
    /// Per-model detail.
    pub breakdown: ModelBreakdown,
}

impl Prediction {
    /// The conservative fail-safe result substituted when a single
    /// inference call fails unexpectedly: `not_verified` at zero
    /// confidence, with a zeroed breakdown.
    pub fn fail_safe() -> Self {
        Self {
            label: Label::NotVerified,
            confidence: 0.0,
            breakdown: ModelBreakdown {
                forest_label: Label::NotVerified,
                forest_confidence: 0.0,
                svm_label: Label::NotVerified,
                svm_confidence: 0.0,
            },
        }
    }
}

/// Held-out and cross-validated diagnostics from one training run.
///
/// Diagnostics only: they never gate whether training "succeeds".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Examples in the training subset.
    pub train_size: usize,
    /// Examples in the held-out subset.
    pub holdout_size: usize,
    /// Forest accuracy on the held-out subset.
    pub forest_holdout_accuracy: f64,
    /// SVM accuracy on the held-out subset.
    pub svm_holdout_accuracy: f64,
    /// Mean 5-fold cross-validated forest accuracy over the training
    /// subset; `None` when the subset is too small to fold.
    pub forest_cv_accuracy: Option<f64>,
    /// Mean 5-fold cross-validated SVM accuracy over the training subset.
    pub svm_cv_accuracy: Option<f64>,
    /// Combined feature width (TF-IDF vocabulary + handcrafted features).
    pub feature_width: usize,
}
