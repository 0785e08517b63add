//! TF-IDF vectorizer over normalized complaint text.
//!
//! Two-phase transform: [`TfIdfVectorizer::fit`] builds a frozen vocabulary
//! of unigrams and bigrams from the normalized training corpus, then
//! [`TfIdfVectorizer::transform`] maps any text to a vector of that fixed
//! width. Terms outside the frozen vocabulary contribute nothing — that is
//! expected inference-time generalization, not an error.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Configuration for vocabulary construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Maximum vocabulary size; the highest-document-frequency terms win.
    pub max_features: usize,
    /// Largest n-gram length (1 = unigrams only, 2 adds bigrams).
    pub max_ngram: usize,
    /// Terms present in more than this fraction of documents are dropped as
    /// non-discriminative.
    pub max_document_frequency: f64,
    /// Minimum number of documents a term must appear in.
    pub min_document_count: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            max_ngram: 2,
            max_document_frequency: 0.95,
            min_document_count: 1,
        }
    }
}

/// TF-IDF vectorizer with a frozen vocabulary.
///
/// Immutable after [`fit`](Self::fit); safe to share across threads for
/// concurrent [`transform`](Self::transform) calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Term -> column index.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    idf: Vec<f64>,
    /// Number of documents seen during fit.
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
        }
    }

    /// Fit the vocabulary and IDF weights on normalized, space-joined
    /// documents. The result is frozen: refitting replaces it wholesale.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(TriageError::analysis(
                "cannot fit vectorizer on an empty corpus",
            ));
        }

        let n = documents.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms: HashSet<String> = self.ngrams(doc).into_iter().collect();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let max_df = (self.config.max_document_frequency * n as f64).ceil() as usize;
        let mut candidates: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.config.min_document_count && *df <= max_df)
            .collect();

        // Keep the most frequent terms up to max_features. Sort by document
        // frequency descending, term ascending, so the cut is deterministic.
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(self.config.max_features);
        // Column order is alphabetical over the surviving terms.
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::with_capacity(candidates.len());
        let mut idf = Vec::with_capacity(candidates.len());
        for (idx, (term, df)) in candidates.into_iter().enumerate() {
            vocabulary.insert(term, idx);
            // Smoothed IDF: ln((1 + n) / (1 + df)) + 1.
            idf.push(((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = n;

        Ok(())
    }

    /// Transform a normalized, space-joined document into an L2-normalized
    /// TF-IDF vector of the frozen vocabulary width.
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(TriageError::analysis(
                "vectorizer used before fit or load",
            ));
        }

        let mut weights = vec![0.0; self.vocabulary.len()];
        for term in self.ngrams(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                weights[idx] += self.idf[idx];
            }
        }

        let norm: f64 = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in &mut weights {
                *w /= norm;
            }
        }

        Ok(weights)
    }

    /// Whether `fit` (or a load of a fitted instance) has happened.
    pub fn is_fitted(&self) -> bool {
        self.n_documents > 0
    }

    /// Width of the frozen vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents seen during fit.
    pub fn document_count(&self) -> usize {
        self.n_documents
    }

    /// Expand a space-joined document into unigrams up to `max_ngram`-grams.
    fn ngrams(&self, document: &str) -> Vec<String> {
        let tokens: Vec<&str> = document.split_whitespace().collect();
        let mut terms = Vec::with_capacity(tokens.len() * self.config.max_ngram);

        for width in 1..=self.config.max_ngram.max(1) {
            if tokens.len() < width {
                break;
            }
            for window in tokens.windows(width) {
                terms.push(window.join(" "));
            }
        }

        terms
    }
}
