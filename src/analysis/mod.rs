//! Text analysis pipeline for complaint normalization.
//!
//! Raw complaint text is never fed to the vectorizer directly. It first goes
//! through [`normalize`]: lowercase, strip everything that is not an ASCII
//! letter or whitespace, tokenize on whitespace, drop stop words and tokens
//! of length <= 2, then Porter-stem what remains. The handcrafted feature
//! extractor (see [`crate::features`]) deliberately works on the *raw* text
//! instead, so punctuation and keyword phrasing survive there.

pub mod normalizer;
pub mod stem;
pub mod stopwords;

pub use normalizer::{normalize, normalized_document};
pub use stem::stem;
pub use stopwords::is_stop_word;
