// Registry Snapshot
//
// *Le Registre* (The Register) - Immutable, validated list of content pages

use crate::entry::ContentEntry;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry loading errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Registry JSON could not be decoded
    #[error("Invalid registry JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries share the same URL
    #[error("Duplicate registry URL: {url}")]
    DuplicateUrl {
        /// Offending URL
        url: String,
    },

    /// Registry file could not be read
    #[error("Failed to read registry {path:?}")]
    Io {
        /// Registry path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Immutable registry snapshot with unique URLs.
///
/// Entry order is significant: it is the order pages are reported in and
/// the tie-break used when two candidates score the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: Vec<ContentEntry>,
}

impl Registry {
    /// Build a registry, rejecting duplicate URLs.
    pub fn new(entries: Vec<ContentEntry>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.url.as_str()) {
                return Err(RegistryError::DuplicateUrl {
                    url: entry.url.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Decode a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<ContentEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a registry JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&content)?;
        debug!(
            "Loaded {} registry entries from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Entries in registry order.
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    /// Iterate entries in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContentEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by exact URL.
    pub fn get(&self, url: &str) -> Option<&ContentEntry> {
        self.entries.iter().find(|entry| entry.url == url)
    }

    /// Distinct pillar keys present in the registry.
    pub fn pillars(&self) -> BTreeSet<&str> {
        self.entries.iter().filter_map(ContentEntry::pillar).collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ContentEntry;
    type IntoIter = std::slice::Iter<'a, ContentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
