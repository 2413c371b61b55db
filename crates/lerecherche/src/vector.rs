// Term Profiles
//
// *Le Vecteur* (The Vector) - Weighted bag-of-words with cosine similarity

use crate::tokens::tokenize;
use leregistre::ContentEntry;
use serde::Serialize;
use std::collections::BTreeMap;

/// Weight of title tokens.
pub const TITLE_WEIGHT: f64 = 3.0;
/// Weight of h1 tokens.
pub const H1_WEIGHT: f64 = 2.5;
/// Weight of description tokens.
pub const DESCRIPTION_WEIGHT: f64 = 2.0;
/// Weight of summary tokens.
pub const SUMMARY_WEIGHT: f64 = 1.5;
/// Weight of each raw tag.
pub const TAG_WEIGHT: f64 = 2.0;

/// Weighted term-frequency profile of one page.
///
/// Terms are kept in a sorted map so every float accumulation runs in the
/// same order, which keeps scores bit-identical across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermProfile {
    weights: BTreeMap<String, f64>,
    magnitude: f64,
}

impl TermProfile {
    /// Build a profile from `(term, weight)` pairs; repeated terms accumulate.
    pub fn from_weighted<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        for (term, weight) in terms {
            *weights.entry(term.into()).or_insert(0.0) += weight;
        }
        let magnitude = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        Self { weights, magnitude }
    }

    /// Accumulated weight of `term` (0 when absent).
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// L2 magnitude.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when no term survived tokenization.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate `(term, weight)` in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(term, weight)| (term.as_str(), *weight))
    }

    /// Heaviest terms first, ties by term.
    pub fn top_terms(&self, n: usize) -> Vec<(&str, f64)> {
        let mut terms: Vec<_> = self.iter().collect();
        terms.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        terms.truncate(n);
        terms
    }

    /// Cosine similarity; 0 if either profile has zero magnitude.
    pub fn cosine(&self, other: &TermProfile) -> f64 {
        if self.magnitude == 0.0 || other.magnitude == 0.0 {
            return 0.0;
        }

        let dot: f64 = self
            .weights
            .iter()
            .filter_map(|(term, weight)| other.weights.get(term).map(|o| weight * o))
            .sum();

        dot / (self.magnitude * other.magnitude)
    }
}

/// Build the term profile of a content entry.
///
/// Tags are taken verbatim; every other field is tokenized.
pub fn build_vector(entry: &ContentEntry) -> TermProfile {
    let weighted = |text: &str, weight: f64| {
        tokenize(text)
            .into_iter()
            .map(move |token| (token, weight))
    };

    let summary = entry.summary.as_deref().unwrap_or_default();
    let tags = entry.tags.iter().map(|tag| (tag.clone(), TAG_WEIGHT));

    TermProfile::from_weighted(
        weighted(&entry.title, TITLE_WEIGHT)
            .chain(weighted(&entry.h1, H1_WEIGHT))
            .chain(weighted(&entry.description, DESCRIPTION_WEIGHT))
            .chain(weighted(summary, SUMMARY_WEIGHT))
            .chain(tags),
    )
}
