// leliens - Selection Policy & Report
//
// *Les Liens* (The Links) - Typed related-link selection and site-wide link health

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Chooses the related-content links of every page in a registry and
//! aggregates them into a site-health report.

/// Markdown rendering.
pub mod format;
/// Per-page selection policy.
pub mod policy;
/// Report aggregation.
pub mod report;
/// Linking shortfalls below configured minimums.
pub mod shortfall;
/// Regression snapshot contract.
pub mod snapshot;

pub use format::render_markdown;
pub use policy::{
    build_recommendations, candidate_universe, recommend, LinkReason, PageRecommendations,
    ScoredCandidate, Selection,
};
pub use report::{
    build_link_intel_report, build_link_intel_report_at, build_link_intel_report_with,
    summarize, BlockedLink, EngineOptions, PageReport, Recommendation, Report, ReportSummary,
};
pub use shortfall::{shortfalls, Shortfall, ShortfallKind};
pub use snapshot::{check_or_record, Snapshot, SnapshotError, SnapshotOutcome};
