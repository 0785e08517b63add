//! Two-stage complaint gating: spam gate, then disaster verification.
//!
//! The spam gate runs strictly first and short-circuits the classifier on a
//! positive verdict. Any unexpected failure in a single classification call
//! is swallowed here and replaced by the conservative fail-safe result
//! (`not_verified`, zero confidence) — pipeline availability wins over
//! individual-call correctness, and callers route `not_verified` to manual
//! review rather than rejecting it.

use serde::{Deserialize, Serialize};

use crate::classifier::ensemble::DisasterClassifier;
use crate::classifier::types::Prediction;
use crate::spam;

/// Outcome of gating one complaint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriageOutcome {
    /// Withheld by the spam gate; the classifier was never invoked.
    Spam,
    /// Passed the spam gate and was classified.
    Classified(Prediction),
}

impl TriageOutcome {
    /// Primary label for the process output channel.
    pub fn primary_label(&self) -> &'static str {
        match self {
            TriageOutcome::Spam => "spam",
            TriageOutcome::Classified(prediction) => prediction.label.as_str(),
        }
    }
}

/// Stateless-per-call triage pipeline over one loaded classifier.
///
/// Holds the read-only artifacts for the process lifetime; concurrent
/// `triage` calls are safe without locking.
#[derive(Debug)]
pub struct TriagePipeline {
    classifier: DisasterClassifier,
}

impl TriagePipeline {
    /// Build a pipeline around a trained (or loaded) classifier.
    pub fn new(classifier: DisasterClassifier) -> Self {
        Self { classifier }
    }

    /// Gate one complaint: spam check first, then ensemble classification.
    ///
    /// Never fails: classifier errors collapse into
    /// [`Prediction::fail_safe`].
    pub fn triage(&self, text: &str) -> TriageOutcome {
        if spam::is_spam(text) {
            return TriageOutcome::Spam;
        }

        let prediction = self
            .classifier
            .predict(text)
            .unwrap_or_else(|_| Prediction::fail_safe());
        TriageOutcome::Classified(prediction)
    }

    /// Borrow the underlying classifier.
    pub fn classifier(&self) -> &DisasterClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ensemble::TrainingConfig;
    use crate::classifier::types::Label;
    use crate::dataset::sample_corpus;

    fn pipeline() -> TriagePipeline {
        let (classifier, _) =
            DisasterClassifier::train(&sample_corpus(), &TrainingConfig::default()).unwrap();
        TriagePipeline::new(classifier)
    }

    #[test]
    fn test_spam_short_circuits() {
        let pipeline = pipeline();
        let outcome = pipeline.triage("free prize winner!!!!");
        assert_eq!(outcome, TriageOutcome::Spam);
        assert_eq!(outcome.primary_label(), "spam");
    }

    #[test]
    fn test_disaster_complaint_is_verified() {
        let pipeline = pipeline();
        let outcome =
            pipeline.triage("Severe flooding in downtown area, need immediate evacuation assistance");
        match outcome {
            TriageOutcome::Classified(prediction) => {
                assert_eq!(prediction.label, Label::Verified);
                assert!(prediction.confidence > 0.5);
            }
            TriageOutcome::Spam => panic!("genuine complaint flagged as spam"),
        }
    }

    #[test]
    fn test_classifier_never_emits_spam_label() {
        let pipeline = pipeline();
        for text in [
            "Street light not working on main road",
            "water rising quickly near the river bank",
        ] {
            let label = pipeline.triage(text).primary_label();
            assert!(label == "verified" || label == "not_verified");
        }
    }
}
