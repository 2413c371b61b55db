// Linking Shortfalls
//
// Cluster and pillar pages that fell below their configured link minimums.

use crate::report::Report;
use leregistre::{PageType, RecommendationConfig, Registry};
use std::fmt;
use tracing::warn;

/// Which minimum was missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortfallKind {
    /// Cluster page with too few sibling cluster links.
    SiblingClusters,
    /// Pillar page with too few links down to its clusters.
    PillarClusters,
}

impl fmt::Display for ShortfallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortfallKind::SiblingClusters => write!(f, "sibling clusters"),
            ShortfallKind::PillarClusters => write!(f, "pillar clusters"),
        }
    }
}

/// A page below its minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    /// Page URL.
    pub url: String,
    /// Minimum that was missed.
    pub kind: ShortfallKind,
    /// Links of that kind actually selected.
    pub found: usize,
    /// Configured minimum.
    pub expected: usize,
}

/// List shortfalls in report order, logging each at WARN.
///
/// A link counts toward the minimum when its destination is a cluster under
/// the page's own pillar, whatever pass selected it, so pinned siblings count.
pub fn shortfalls(
    report: &Report,
    registry: &Registry,
    config: &RecommendationConfig,
) -> Vec<Shortfall> {
    let found: Vec<Shortfall> = report
        .pages
        .iter()
        .filter_map(|page| {
            let (kind, expected) = match page.page_type {
                PageType::Cluster => (
                    ShortfallKind::SiblingClusters,
                    config.min_cluster_sibling_links,
                ),
                PageType::Pillar => (
                    ShortfallKind::PillarClusters,
                    config.min_pillar_cluster_links,
                ),
                PageType::Tool | PageType::Trust | PageType::Other => return None,
            };
            let entry = registry.get(&page.url)?;

            let count = page
                .recommendations
                .iter()
                .filter(|r| r.type_badge == PageType::Cluster)
                .filter_map(|r| registry.get(&r.url))
                .filter(|dest| dest.same_pillar_as(entry))
                .count();

            (count < expected).then(|| Shortfall {
                url: page.url.clone(),
                kind,
                found: count,
                expected,
            })
        })
        .collect();

    for s in &found {
        warn!("{}: {} {} (minimum {})", s.url, s.found, s.kind, s.expected);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_link_intel_report_at;
    use chrono::{TimeZone, Utc};
    use leregistre::{ContentEntry, Locale, Registry};

    #[test]
    fn test_flags_thin_clusters_and_pillars() {
        let registry = Registry::new(vec![
            ContentEntry::new("/uk/sleep", PageType::Pillar, Locale::Uk, "Sleep")
                .with_pillar("sleep"),
            ContentEntry::new("/uk/sleep/naps", PageType::Cluster, Locale::Uk, "Naps")
                .with_pillar("sleep"),
            ContentEntry::new("/uk/sleep/routine", PageType::Cluster, Locale::Uk, "Routine")
                .with_pillar("sleep"),
            ContentEntry::new("/tools/noise", PageType::Tool, Locale::Global, "Noise"),
        ])
        .expect("registry");
        let config = RecommendationConfig::default();
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("time");
        let report = build_link_intel_report_at(&registry, &config, at);

        let found = shortfalls(&report, &registry, &config);

        // 2 clusters under the pillar (minimum 3); each cluster has 1 sibling (minimum 2).
        assert_eq!(
            found,
            vec![
                Shortfall {
                    url: "/uk/sleep".into(),
                    kind: ShortfallKind::PillarClusters,
                    found: 2,
                    expected: 3,
                },
                Shortfall {
                    url: "/uk/sleep/naps".into(),
                    kind: ShortfallKind::SiblingClusters,
                    found: 1,
                    expected: 2,
                },
                Shortfall {
                    url: "/uk/sleep/routine".into(),
                    kind: ShortfallKind::SiblingClusters,
                    found: 1,
                    expected: 2,
                },
            ]
        );
    }

    #[test]
    fn test_pinned_sibling_counts_toward_minimum() {
        let sleep = |url: &str, title: &str| {
            ContentEntry::new(url, PageType::Cluster, Locale::Uk, title).with_pillar("sleep")
        };
        let registry = Registry::new(vec![
            ContentEntry::new("/uk/sleep", PageType::Pillar, Locale::Uk, "Sleep")
                .with_pillar("sleep"),
            sleep("/uk/sleep/naps", "Naps"),
            sleep("/uk/sleep/routine", "Routine"),
            sleep("/uk/sleep/wind-down", "Wind down"),
        ])
        .expect("registry");
        let mut config = RecommendationConfig::default();
        config
            .pinned_links
            .insert("/uk/sleep/naps".into(), vec!["/uk/sleep/routine".into()]);
        let report = build_link_intel_report_at(&registry, &config, Utc::now());

        // One sibling arrives through the pin, the other through the sibling pass.
        let naps = report.page("/uk/sleep/naps").expect("naps");
        assert_eq!(naps.recommendations[0].url, "/uk/sleep/routine");
        assert!(shortfalls(&report, &registry, &config).is_empty());
    }

    #[test]
    fn test_tools_never_fall_short() {
        let registry = Registry::new(vec![ContentEntry::new(
            "/tools/noise",
            PageType::Tool,
            Locale::Global,
            "Noise",
        )])
        .expect("registry");
        let config = RecommendationConfig::default();
        let report = build_link_intel_report_at(&registry, &config, Utc::now());
        assert!(shortfalls(&report, &registry, &config).is_empty());
    }
}
