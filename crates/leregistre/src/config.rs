// Link Policy Configuration
//
// *La Politique* (The Policy) - Caps, bans and pins for recommended links

use crate::entry::{normalise_url, PageType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Per-page-type link caps. `None` falls back to the global cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkCaps {
    /// Cap for pillar pages; also bounds the pillar-cluster pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillar: Option<usize>,
    /// Cap for cluster pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<usize>,
    /// Cap for tool pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<usize>,
    /// Cap for trust pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust: Option<usize>,
    /// Cap for other pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<usize>,
}

impl Default for LinkCaps {
    fn default() -> Self {
        Self {
            pillar: Some(10),
            cluster: Some(8),
            tool: Some(5),
            trust: Some(4),
            other: None,
        }
    }
}

impl LinkCaps {
    /// Configured cap for `page_type`, if any.
    pub fn get(&self, page_type: PageType) -> Option<usize> {
        match page_type {
            PageType::Pillar => self.pillar,
            PageType::Cluster => self.cluster,
            PageType::Tool => self.tool,
            PageType::Trust => self.trust,
            PageType::Other => self.other,
        }
    }
}

/// Engine configuration, passed explicitly into every entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Per-type caps.
    pub max_links_by_type: LinkCaps,

    /// Sibling clusters a cluster page should reach (diagnostic only).
    pub min_cluster_sibling_links: usize,

    /// Upper bound of the sibling-cluster pass.
    pub max_cluster_sibling_links: usize,

    /// Clusters a pillar page should reach (diagnostic only).
    pub min_pillar_cluster_links: usize,

    /// Global hard cap on recommendations per page.
    pub max_related_links: usize,

    /// Source URL -> destinations forced to the front of the list.
    pub pinned_links: BTreeMap<String, Vec<String>>,

    /// Source URL -> destinations never recommended from that source.
    pub banned_links: BTreeMap<String, Vec<String>>,

    /// Destinations never recommended from anywhere.
    pub banned_destinations_global: BTreeSet<String>,

    /// Reserved. Cross-locale linking is not supported; the policy always
    /// applies locale compatibility.
    pub allow_cross_locale: bool,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_links_by_type: LinkCaps::default(),
            min_cluster_sibling_links: 2,
            max_cluster_sibling_links: 4,
            min_pillar_cluster_links: 3,
            max_related_links: 10,
            pinned_links: BTreeMap::new(),
            banned_links: BTreeMap::new(),
            banned_destinations_global: BTreeSet::new(),
            allow_cross_locale: false,
        }
    }
}

impl RecommendationConfig {
    /// Final cap for a page: the type cap (or the global cap when unset),
    /// never above the global cap.
    pub fn link_cap(&self, page_type: PageType) -> usize {
        self.max_links_by_type
            .get(page_type)
            .unwrap_or(self.max_related_links)
            .min(self.max_related_links)
    }

    /// Normalised destinations banned for `source_url`.
    ///
    /// Keys of `banned_links` match after trailing-slash normalisation.
    pub fn banned_for(&self, source_url: &str) -> HashSet<String> {
        let source = normalise_url(source_url);
        let per_page = self
            .banned_links
            .iter()
            .filter(|(key, _)| normalise_url(key) == source)
            .flat_map(|(_, urls)| urls.iter());

        self.banned_destinations_global
            .iter()
            .chain(per_page)
            .map(|url| normalise_url(url).to_string())
            .collect()
    }

    /// Destinations pinned for `source_url`, in configured order.
    pub fn pinned_for(&self, source_url: &str) -> Vec<&str> {
        let source = normalise_url(source_url);
        self.pinned_links
            .iter()
            .filter(|(key, _)| normalise_url(key) == source)
            .flat_map(|(_, urls)| urls.iter().map(String::as_str))
            .collect()
    }
}
