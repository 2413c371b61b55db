// lerecherche - Vectorizer & Scorer
//
// *La Recherche* (The Search) - Bag-of-words term profiles and page-to-page affinity

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Turns content entries into weighted term profiles and scores how well a
//! candidate page fits as a related-content link from a source page.

/// Precomputed per-registry profiles.
pub mod index;
/// Similarity scoring.
pub mod ranking;
/// Tokenizer and stop words.
pub mod tokens;
/// Term profiles.
pub mod vector;

pub use index::ProfileIndex;
pub use ranking::{rank_order, score_candidate, score_with_profiles, SAME_PILLAR_BONUS};
pub use tokens::tokenize;
pub use vector::{build_vector, TermProfile};
