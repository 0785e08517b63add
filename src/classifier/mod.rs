//! Dual classifier ensemble for disaster verification.
//!
//! Two independently trained supervised models — a bagged decision-tree
//! forest and an RBF-kernel SVM — consume the same combined representation
//! (TF-IDF over normalized text, concatenated with five handcrafted
//! features from the raw text) and are combined by unweighted probability
//! averaging. [`DisasterClassifier`] is the service object that owns both
//! models plus the vectorizer and exposes training and inference.

pub mod ensemble;
pub mod forest;
pub mod split;
pub mod svm;
pub mod types;

pub use ensemble::{DisasterClassifier, TrainingConfig};
pub use forest::{ForestConfig, RandomForest};
pub use svm::{KernelSvm, SvmConfig};
pub use types::{
    CLASS_COUNT, Label, LabeledComplaint, ModelBreakdown, Prediction, TrainingReport,
};
