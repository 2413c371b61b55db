// Similarity Scoring
//
// *Le Classement* (The Ranking) - Page-to-page affinity and the shared tie-break order

use crate::vector::{build_vector, TermProfile};
use leregistre::ContentEntry;
use std::cmp::Ordering;

/// Added when both pages sit under the same pillar.
pub const SAME_PILLAR_BONUS: f64 = 0.2;

/// Subtracted when a page is scored against itself.
pub const SELF_LINK_PENALTY: f64 = 1.0;

/// Affinity of `candidate` as a link destination from `source`.
///
/// Builds both term profiles on the fly. Use [`crate::ProfileIndex`] when
/// scoring many pairs.
pub fn score_candidate(source: &ContentEntry, candidate: &ContentEntry) -> f64 {
    score_with_profiles(
        source,
        &build_vector(source),
        candidate,
        &build_vector(candidate),
    )
}

/// Affinity from precomputed profiles.
///
/// Cosine similarity plus the same-pillar bonus minus the self-link
/// penalty, clamped at zero. Not normalised to `0..=1`.
pub fn score_with_profiles(
    source: &ContentEntry,
    source_profile: &TermProfile,
    candidate: &ContentEntry,
    candidate_profile: &TermProfile,
) -> f64 {
    let similarity = source_profile.cosine(candidate_profile);

    let bonus = if source.shares_pillar_with(candidate) {
        SAME_PILLAR_BONUS
    } else {
        0.0
    };

    let penalty = if source.url == candidate.url {
        SELF_LINK_PENALTY
    } else {
        0.0
    };

    (similarity + bonus - penalty).max(0.0)
}

/// Ranking order: higher score first, then earlier registry position.
pub fn rank_order(a_score: f64, a_position: usize, b_score: f64, b_position: usize) -> Ordering {
    b_score
        .partial_cmp(&a_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_position.cmp(&b_position))
}
