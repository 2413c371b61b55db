// Report Aggregation
//
// *Le Rapport* (The Report) - Per-page link lists and site-wide health signals

use crate::policy::{recommend, LinkReason, PageRecommendations, ScoredCandidate};
use chrono::{DateTime, SecondsFormat, Utc};
use lerecherche::ProfileIndex;
use leregistre::{Locale, PageType, RecommendationConfig, Registry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Pages with fewer recommendations than this count as editorial opportunities.
pub const OPPORTUNITY_THRESHOLD: usize = 3;

/// One recommended link as emitted in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Destination URL.
    pub url: String,
    /// Destination title.
    pub label: String,
    /// Destination description.
    pub description: String,
    /// Destination page type.
    pub type_badge: PageType,
    /// Score rounded to three decimals.
    pub score: f64,
    /// Selection reason.
    pub reason: LinkReason,
}

impl From<&ScoredCandidate<'_>> for Recommendation {
    fn from(candidate: &ScoredCandidate<'_>) -> Self {
        Self {
            url: candidate.entry.url.clone(),
            label: candidate.entry.title.clone(),
            description: candidate.entry.description.clone(),
            type_badge: candidate.entry.page_type,
            score: round_score(candidate.score),
            reason: candidate.reason,
        }
    }
}

/// A scored destination that was not selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedLink {
    /// Destination URL.
    pub url: String,
    /// Why it was left out.
    pub reason: LinkReason,
}

/// Policy result for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    /// Page URL.
    pub url: String,
    /// Page type.
    #[serde(rename = "type")]
    pub page_type: PageType,
    /// Page locale.
    pub locale: Locale,
    /// Selected links.
    pub recommendations: Vec<Recommendation>,
    /// Diagnostic leftovers.
    pub blocked: Vec<BlockedLink>,
}

/// Site-wide health signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Page count.
    pub pages: usize,
    /// Orphan count.
    pub orphans: usize,
    /// Pages with zero recommendations.
    pub orphan_pages: Vec<String>,
    /// Pages with one or two recommendations.
    pub weak_pages: Vec<String>,
    /// Pages that reached the global cap.
    pub overlinked_pages: Vec<String>,
    /// Pillar -> its pages below the opportunity threshold.
    pub opportunities_by_pillar: BTreeMap<String, Vec<String>>,
}

/// Full link-intelligence report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// ISO-8601 run timestamp.
    pub run_at: String,
    /// Health signals.
    pub summary: ReportSummary,
    /// Per-page results in registry order.
    pub pages: Vec<PageReport>,
}

impl Report {
    /// Page report for `url`.
    pub fn page(&self, url: &str) -> Option<&PageReport> {
        self.pages.iter().find(|page| page.url == url)
    }
}

/// Execution options that do not change the report content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Run the per-page policy on the rayon pool.
    pub parallel: bool,
}

/// Build the report, stamped with the current time.
pub fn build_link_intel_report(registry: &Registry, config: &RecommendationConfig) -> Report {
    build_link_intel_report_at(registry, config, Utc::now())
}

/// Build the report with an explicit timestamp.
pub fn build_link_intel_report_at(
    registry: &Registry,
    config: &RecommendationConfig,
    run_at: DateTime<Utc>,
) -> Report {
    build_link_intel_report_with(registry, config, EngineOptions::default(), run_at)
}

/// Build the report with explicit execution options and timestamp.
///
/// Sequential and parallel runs produce identical reports.
pub fn build_link_intel_report_with(
    registry: &Registry,
    config: &RecommendationConfig,
    options: EngineOptions,
    run_at: DateTime<Utc>,
) -> Report {
    if config.allow_cross_locale {
        warn!("allow_cross_locale is not supported; locale compatibility still applies");
    }

    let index = ProfileIndex::build(registry);
    let page_report = |position: usize| {
        let page = index.entry(position);
        to_page_report(
            page.url.clone(),
            page.page_type,
            page.locale,
            recommend(page, index.profile(position), &index, config),
        )
    };

    let pages: Vec<PageReport> = if options.parallel {
        (0..index.len()).into_par_iter().map(page_report).collect()
    } else {
        (0..index.len()).map(page_report).collect()
    };

    let summary = summarize(registry, &pages, config);
    info!(
        "Link report: {} pages, {} orphans, {} weak, {} over-linked",
        summary.pages,
        summary.orphans,
        summary.weak_pages.len(),
        summary.overlinked_pages.len()
    );

    Report {
        run_at: run_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        summary,
        pages,
    }
}

fn to_page_report(
    url: String,
    page_type: PageType,
    locale: Locale,
    result: PageRecommendations<'_>,
) -> PageReport {
    PageReport {
        url,
        page_type,
        locale,
        recommendations: result.recommendations.iter().map(Recommendation::from).collect(),
        blocked: result
            .blocked
            .iter()
            .map(|c| BlockedLink {
                url: c.entry.url.clone(),
                reason: c.reason,
            })
            .collect(),
    }
}

/// Derive health signals from computed page reports.
///
/// `pages` must be in registry order; no scoring happens here.
pub fn summarize(
    registry: &Registry,
    pages: &[PageReport],
    config: &RecommendationConfig,
) -> ReportSummary {
    let mut summary = ReportSummary {
        pages: pages.len(),
        ..ReportSummary::default()
    };

    for (entry, page) in registry.iter().zip(pages) {
        let count = page.recommendations.len();

        match count {
            0 => summary.orphan_pages.push(page.url.clone()),
            1..=2 => summary.weak_pages.push(page.url.clone()),
            _ => {}
        }

        if count >= config.max_related_links {
            summary.overlinked_pages.push(page.url.clone());
        }

        if let Some(pillar) = entry.pillar() {
            let bucket = summary
                .opportunities_by_pillar
                .entry(pillar.to_string())
                .or_default();
            if count < OPPORTUNITY_THRESHOLD {
                bucket.push(page.url.clone());
            }
        }
    }

    summary.orphans = summary.orphan_pages.len();
    summary
}

/// Round a score to three decimal places for reporting.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use leregistre::ContentEntry;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn registry() -> Registry {
        Registry::new(vec![
            ContentEntry::new("/uk/breathing", PageType::Pillar, Locale::Uk, "Breathing exercises")
                .with_pillar("breathing"),
            ContentEntry::new("/uk/breathing/box", PageType::Cluster, Locale::Uk, "Box breathing")
                .with_pillar("breathing"),
            ContentEntry::new(
                "/uk/breathing/coherent",
                PageType::Cluster,
                Locale::Uk,
                "Coherent breathing",
            )
            .with_pillar("breathing"),
            ContentEntry::new("/tools/breath", PageType::Tool, Locale::Global, "Breath tools"),
            ContentEntry::new("/us/sleep/naps", PageType::Cluster, Locale::Us, "Naps")
                .with_pillar("sleep"),
        ])
        .expect("registry")
    }

    #[test]
    fn test_orphan_detection_for_isolated_page() {
        let report = build_link_intel_report_at(
            &registry(),
            &RecommendationConfig::default(),
            fixed_time(),
        );

        // The US cluster has no other US/GLOBAL clusters or pillars, and the only
        // tool is reachable, so it is weak rather than orphaned.
        let naps = report.page("/us/sleep/naps").expect("naps page");
        assert_eq!(naps.recommendations.len(), 1);
        assert!(report.summary.weak_pages.contains(&"/us/sleep/naps".to_string()));

        let isolated = Registry::new(vec![
            ContentEntry::new("/us/sleep/naps", PageType::Cluster, Locale::Us, "Naps")
                .with_pillar("sleep"),
            ContentEntry::new("/uk/breathing/box", PageType::Cluster, Locale::Uk, "Box breathing")
                .with_pillar("breathing"),
            ContentEntry::new("/trust/citations", PageType::Trust, Locale::Global, "Citations"),
        ])
        .expect("registry");
        let report = build_link_intel_report_at(
            &isolated,
            &RecommendationConfig::default(),
            fixed_time(),
        );
        assert!(report.page("/us/sleep/naps").expect("page").recommendations.is_empty());
        assert!(report.summary.orphan_pages.contains(&"/us/sleep/naps".to_string()));
        assert_eq!(report.summary.orphans, report.summary.orphan_pages.len());
    }

    #[test]
    fn test_summary_buckets() {
        let report = build_link_intel_report_at(
            &registry(),
            &RecommendationConfig {
                max_related_links: 3,
                ..RecommendationConfig::default()
            },
            fixed_time(),
        );

        assert_eq!(report.summary.pages, 5);
        // box: parent pillar, sibling, tool CTA
        let box_page = report.page("/uk/breathing/box").expect("box");
        assert_eq!(box_page.recommendations.len(), 3);
        assert!(report
            .summary
            .overlinked_pages
            .contains(&"/uk/breathing/box".to_string()));
        assert!(!report
            .summary
            .opportunities_by_pillar["breathing"]
            .contains(&"/uk/breathing/box".to_string()));
        assert_eq!(
            report.summary.opportunities_by_pillar["sleep"],
            vec!["/us/sleep/naps".to_string()]
        );
        assert!(!report.summary.opportunities_by_pillar.contains_key("tools"));
    }

    #[test]
    fn test_empty_registry_produces_empty_report() {
        let report = build_link_intel_report_at(
            &Registry::default(),
            &RecommendationConfig::default(),
            fixed_time(),
        );
        assert!(report.pages.is_empty());
        assert_eq!(report.summary, ReportSummary::default());
    }

    #[test]
    fn test_json_shape_matches_report_contract() {
        let report = build_link_intel_report_at(
            &registry(),
            &RecommendationConfig::default(),
            fixed_time(),
        );
        let json = serde_json::to_value(&report).expect("serialize");

        assert_eq!(json["runAt"], "2026-10-19T08:30:00.000Z");
        for key in [
            "pages",
            "orphans",
            "orphanPages",
            "weakPages",
            "overlinkedPages",
            "opportunitiesByPillar",
        ] {
            assert!(json["summary"].get(key).is_some(), "missing summary.{key}");
        }

        let page = &json["pages"][1];
        assert_eq!(page["type"], "cluster");
        assert_eq!(page["locale"], "UK");
        let rec = &page["recommendations"][0];
        assert_eq!(rec["typeBadge"], "pillar");
        assert_eq!(rec["reason"], "parent pillar");
        assert!(rec.get("label").is_some());
        assert!(rec.get("description").is_some());
        assert!(rec["score"].is_f64());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let registry = registry();
        let config = RecommendationConfig::default();
        let sequential = build_link_intel_report_with(
            &registry,
            &config,
            EngineOptions { parallel: false },
            fixed_time(),
        );
        let parallel = build_link_intel_report_with(
            &registry,
            &config,
            EngineOptions { parallel: true },
            fixed_time(),
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_scores_are_rounded_to_three_decimals() {
        assert_eq!(round_score(0.70710678), 0.707);
        assert_eq!(round_score(0.0), 0.0);
        assert_eq!(round_score(1.2), 1.2);
    }
}
