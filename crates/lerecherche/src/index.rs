// Profile Index
//
// *L'Index* (The Index) - Term profiles built once per registry entry

use crate::ranking::score_with_profiles;
use crate::vector::{build_vector, TermProfile};
use leregistre::{ContentEntry, Registry};
use std::collections::HashMap;
use tracing::debug;

/// Registry entries paired with their precomputed term profiles.
///
/// Read-only after construction, so one index can be shared by every
/// per-page policy pass, sequential or parallel.
#[derive(Debug)]
pub struct ProfileIndex<'r> {
    registry: &'r Registry,
    profiles: Vec<TermProfile>,
    positions: HashMap<&'r str, usize>,
}

impl<'r> ProfileIndex<'r> {
    /// Vectorize every entry of `registry`.
    pub fn build(registry: &'r Registry) -> Self {
        let profiles: Vec<TermProfile> = registry.iter().map(build_vector).collect();
        let positions = registry
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.url.as_str(), i))
            .collect();

        debug!(
            "Built {} term profiles ({} distinct terms total)",
            profiles.len(),
            profiles.iter().map(TermProfile::len).sum::<usize>()
        );

        Self {
            registry,
            profiles,
            positions,
        }
    }

    /// Underlying registry.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Entry at `position`.
    pub fn entry(&self, position: usize) -> &'r ContentEntry {
        &self.registry.entries()[position]
    }

    /// Profile of the entry at `position`.
    pub fn profile(&self, position: usize) -> &TermProfile {
        &self.profiles[position]
    }

    /// Registry position of `url`.
    pub fn position(&self, url: &str) -> Option<usize> {
        self.positions.get(url).copied()
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True for an empty registry.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Score the candidate at `candidate` as a destination from `source`.
    pub fn score(&self, source: usize, candidate: usize) -> f64 {
        score_with_profiles(
            self.entry(source),
            self.profile(source),
            self.entry(candidate),
            self.profile(candidate),
        )
    }
}
