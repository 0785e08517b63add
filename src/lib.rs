//! # complaint-triage
//!
//! Two-stage gating pipeline for free-text citizen complaints:
//!
//! 1. A deterministic, rule-based spam gate ([`spam`]) withholds obvious
//!    spam before any model runs.
//! 2. A dual-classifier ensemble ([`classifier`]) — a bagged decision-tree
//!    forest and an RBF-kernel SVM over a shared TF-IDF plus
//!    handcrafted-feature representation — decides `verified` (disaster)
//!    versus `not_verified` (manual review) by averaging the two models'
//!    class probabilities.
//!
//! Trained artifacts (vectorizer, forest, SVM) are persisted as an atomic,
//! versioned set by [`model_store`] and held read-only for the process
//! lifetime; [`pipeline`] composes the two stages with a conservative
//! fail-safe default for per-call inference failures.

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model_store;
pub mod pipeline;
pub mod spam;
pub mod vectorizer;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
