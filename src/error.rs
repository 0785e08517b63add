//! Error types for the complaint-triage library.
//!
//! All fallible operations in this crate return [`Result`], whose error type
//! is the [`TriageError`] enum. Training failures are fatal and surfaced to
//! the caller; per-complaint inference failures are swallowed at the pipeline
//! boundary and mapped to the conservative `not_verified` default (see
//! [`crate::pipeline`]).

use std::io;

use thiserror::Error;

/// The main error type for triage operations.
#[derive(Error, Debug)]
pub enum TriageError {
    /// I/O errors (artifact files, dataset files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors (manifest, CLI output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary artifact serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Text analysis errors (vectorizer used before fit, empty vocabulary).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Training dataset errors (missing columns, unparseable labels).
    /// Fatal to the training procedure.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Training procedure errors (empty corpus, single-label corpus).
    #[error("Training error: {0}")]
    Training(String),

    /// Inference attempted with no trained artifacts present.
    /// Non-fatal: the caller may train and retry.
    #[error("models not loaded: train or load artifacts before predicting")]
    ModelsNotLoaded,

    /// A loaded artifact disagrees with its siblings about the combined
    /// feature width. Artifacts are versioned as a set; mixing runs is a
    /// hard failure, never silently tolerated.
    #[error("artifact mismatch: expected feature width {expected}, found {found}")]
    ArtifactMismatch {
        /// Width implied by the vectorizer plus handcrafted features.
        expected: usize,
        /// Width recorded by the model or manifest.
        found: usize,
    },

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with [`TriageError`].
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TriageError::Analysis(msg.into())
    }

    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        TriageError::Dataset(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        TriageError::Training(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        TriageError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TriageError::Other(msg.into())
    }
}

impl From<bincode::Error> for TriageError {
    fn from(err: bincode::Error) -> Self {
        TriageError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TriageError::analysis("vectorizer not fitted");
        assert_eq!(error.to_string(), "Analysis error: vectorizer not fitted");

        let error = TriageError::dataset("missing label column");
        assert_eq!(error.to_string(), "Dataset error: missing label column");

        let error = TriageError::ArtifactMismatch {
            expected: 1005,
            found: 873,
        };
        assert!(error.to_string().contains("1005"));
        assert!(error.to_string().contains("873"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let triage_error = TriageError::from(io_error);

        match triage_error {
            TriageError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
