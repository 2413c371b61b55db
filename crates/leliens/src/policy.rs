// Selection Policy
//
// *La Politique des Liens* (The Link Policy) - Typed candidate pools, top-N passes and caps

use lerecherche::{build_vector, rank_order, score_with_profiles, ProfileIndex, TermProfile};
use leregistre::{normalise_url, ContentEntry, PageType, RecommendationConfig, Registry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Number of diagnostic entries kept in the blocked list.
pub const BLOCKED_LIMIT: usize = 5;

/// Why a destination was selected (or left out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkReason {
    /// Default tag of every scored candidate.
    #[serde(rename = "semantic match")]
    SemanticMatch,
    /// Forced by configuration.
    #[serde(rename = "pinned")]
    Pinned,
    /// Pillar hub of a cluster page.
    #[serde(rename = "parent pillar")]
    ParentPillar,
    /// Cluster under the same pillar as a cluster page.
    #[serde(rename = "sibling cluster")]
    SiblingCluster,
    /// Cluster from another pillar.
    #[serde(rename = "cross-pillar related")]
    CrossPillarRelated,
    /// Tool call-to-action.
    #[serde(rename = "tool CTA")]
    ToolCta,
    /// Cluster under a pillar page.
    #[serde(rename = "pillar cluster")]
    PillarCluster,
    /// Pillar hub of another topic.
    #[serde(rename = "cross-pillar hub")]
    CrossPillarHub,
    /// Article explaining a tool.
    #[serde(rename = "explainer guide")]
    ExplainerGuide,
    /// Pillar hub linked from a tool.
    #[serde(rename = "pillar hub")]
    PillarHub,
    /// Alternative tool.
    #[serde(rename = "related tool")]
    RelatedTool,
    /// Another trust page.
    #[serde(rename = "related trust")]
    RelatedTrust,
    /// Scored but not selected.
    #[serde(rename = "lower priority or cap reached")]
    CapReached,
}

impl LinkReason {
    /// Human-readable tag, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            LinkReason::SemanticMatch => "semantic match",
            LinkReason::Pinned => "pinned",
            LinkReason::ParentPillar => "parent pillar",
            LinkReason::SiblingCluster => "sibling cluster",
            LinkReason::CrossPillarRelated => "cross-pillar related",
            LinkReason::ToolCta => "tool CTA",
            LinkReason::PillarCluster => "pillar cluster",
            LinkReason::CrossPillarHub => "cross-pillar hub",
            LinkReason::ExplainerGuide => "explainer guide",
            LinkReason::PillarHub => "pillar hub",
            LinkReason::RelatedTool => "related tool",
            LinkReason::RelatedTrust => "related trust",
            LinkReason::CapReached => "lower priority or cap reached",
        }
    }
}

impl fmt::Display for LinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate destination with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'r> {
    /// Destination page.
    pub entry: &'r ContentEntry,
    /// Registry position of the destination (tie-break key).
    pub position: usize,
    /// Affinity score (not normalised).
    pub score: f64,
    /// Selection reason.
    pub reason: LinkReason,
}

impl<'r> ScoredCandidate<'r> {
    fn tagged(&self, reason: LinkReason) -> Self {
        Self {
            reason,
            ..self.clone()
        }
    }
}

/// Policy output for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRecommendations<'r> {
    /// Selected links, in selection order.
    pub recommendations: Vec<ScoredCandidate<'r>>,
    /// Best-scored candidates that did not make the list.
    pub blocked: Vec<ScoredCandidate<'r>>,
}

/// Which candidates a pass draws from, relative to the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    /// Pages of this type under the same pillar.
    SamePillar(PageType),
    /// Pages of this type under a different pillar.
    OtherPillar(PageType),
    /// All pages of this type.
    Any(PageType),
}

impl Pool {
    fn admits(self, page: &ContentEntry, candidate: &ContentEntry) -> bool {
        match self {
            Pool::SamePillar(kind) => {
                candidate.page_type == kind && candidate.same_pillar_as(page)
            }
            Pool::OtherPillar(kind) => {
                candidate.page_type == kind && candidate.differs_in_pillar_from(page)
            }
            Pool::Any(kind) => candidate.page_type == kind,
        }
    }
}

/// How a pass orders its pool before taking the first `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ranking {
    /// Highest score first.
    Score,
    /// Registry order.
    Declared,
}

#[derive(Debug, Clone, Copy)]
struct Pass {
    pool: Pool,
    limit: usize,
    ranking: Ranking,
    reason: LinkReason,
}

impl Pass {
    fn top(pool: Pool, limit: usize, reason: LinkReason) -> Self {
        Self {
            pool,
            limit,
            ranking: Ranking::Score,
            reason,
        }
    }

    fn first_declared(pool: Pool, reason: LinkReason) -> Self {
        Self {
            pool,
            limit: 1,
            ranking: Ranking::Declared,
            reason,
        }
    }

    fn select<'r>(
        &self,
        page: &ContentEntry,
        candidates: &[ScoredCandidate<'r>],
    ) -> Vec<ScoredCandidate<'r>> {
        let mut pool: Vec<&ScoredCandidate<'r>> = candidates
            .iter()
            .filter(|c| self.pool.admits(page, c.entry))
            .collect();

        if self.ranking == Ranking::Score {
            pool.sort_by(|a, b| rank_order(a.score, a.position, b.score, b.position));
        }

        pool.into_iter()
            .take(self.limit)
            .map(|c| c.tagged(self.reason))
            .collect()
    }
}

/// The ordered passes run for a page of `page_type`.
fn passes_for(page_type: PageType, config: &RecommendationConfig) -> Vec<Pass> {
    match page_type {
        PageType::Cluster => vec![
            Pass::first_declared(Pool::SamePillar(PageType::Pillar), LinkReason::ParentPillar),
            Pass::top(
                Pool::SamePillar(PageType::Cluster),
                config.max_cluster_sibling_links,
                LinkReason::SiblingCluster,
            ),
            Pass::top(
                Pool::OtherPillar(PageType::Cluster),
                2,
                LinkReason::CrossPillarRelated,
            ),
            Pass::top(Pool::Any(PageType::Tool), 1, LinkReason::ToolCta),
        ],
        PageType::Pillar => vec![
            Pass::top(
                Pool::SamePillar(PageType::Cluster),
                config
                    .max_links_by_type
                    .get(PageType::Pillar)
                    .unwrap_or(config.max_related_links),
                LinkReason::PillarCluster,
            ),
            Pass::top(
                Pool::OtherPillar(PageType::Pillar),
                2,
                LinkReason::CrossPillarHub,
            ),
            Pass::top(Pool::Any(PageType::Tool), 2, LinkReason::ToolCta),
        ],
        PageType::Tool => vec![
            Pass::top(Pool::Any(PageType::Cluster), 2, LinkReason::ExplainerGuide),
            Pass::top(Pool::Any(PageType::Pillar), 1, LinkReason::PillarHub),
            Pass::top(Pool::Any(PageType::Tool), 1, LinkReason::RelatedTool),
        ],
        PageType::Trust => vec![Pass::top(
            Pool::Any(PageType::Trust),
            3,
            LinkReason::RelatedTrust,
        )],
        PageType::Other => Vec::new(),
    }
}

/// Ordered, de-duplicated accumulation of selected links.
///
/// The first candidate seen for a destination URL wins; later ones are
/// dropped without replacing it.
#[derive(Debug, Default)]
pub struct Selection<'r> {
    picks: Vec<ScoredCandidate<'r>>,
    seen: HashSet<&'r str>,
}

impl<'r> Selection<'r> {
    /// Fold step: append `candidate` unless its URL is already selected.
    pub fn with(mut self, candidate: ScoredCandidate<'r>) -> Self {
        if self.seen.insert(candidate.entry.url.as_str()) {
            self.picks.push(candidate);
        }
        self
    }

    /// Whether `url` has been selected.
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Selected links, in order.
    pub fn into_picks(self) -> Vec<ScoredCandidate<'r>> {
        self.picks
    }
}

/// Score every eligible destination for `page`, in registry order.
///
/// Eligible means: not the page itself, locale compatible and not banned.
pub fn candidate_universe<'r>(
    page: &ContentEntry,
    page_profile: &TermProfile,
    index: &ProfileIndex<'r>,
    config: &RecommendationConfig,
) -> Vec<ScoredCandidate<'r>> {
    let banned = config.banned_for(&page.url);

    index
        .registry()
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.url != page.url)
        .filter(|(_, entry)| page.locale.is_compatible_with(entry.locale))
        .filter(|(_, entry)| !banned.contains(normalise_url(&entry.url)))
        .map(|(position, entry)| ScoredCandidate {
            entry,
            position,
            score: score_with_profiles(page, page_profile, entry, index.profile(position)),
            reason: LinkReason::SemanticMatch,
        })
        .collect()
}

fn pinned_candidates<'r>(
    page: &ContentEntry,
    candidates: &[ScoredCandidate<'r>],
    config: &RecommendationConfig,
) -> Vec<ScoredCandidate<'r>> {
    config
        .pinned_for(&page.url)
        .into_iter()
        .filter_map(|pinned| {
            let found = candidates
                .iter()
                .find(|c| normalise_url(&c.entry.url) == normalise_url(pinned));
            if found.is_none() {
                warn!(
                    "Pinned link {} -> {} is not an eligible destination; ignoring",
                    page.url, pinned
                );
            }
            found.map(|c| c.tagged(LinkReason::Pinned))
        })
        .collect()
}

/// Run the selection policy for `page` against a prepared index.
pub fn recommend<'r>(
    page: &ContentEntry,
    page_profile: &TermProfile,
    index: &ProfileIndex<'r>,
    config: &RecommendationConfig,
) -> PageRecommendations<'r> {
    let candidates = candidate_universe(page, page_profile, index, config);

    let pinned = pinned_candidates(page, &candidates, config);
    let selected = passes_for(page.page_type, config)
        .iter()
        .flat_map(|pass| pass.select(page, &candidates))
        .fold(
            pinned.into_iter().fold(Selection::default(), Selection::with),
            Selection::with,
        );

    let cap = config.link_cap(page.page_type);
    let mut recommendations = selected.into_picks();
    recommendations.truncate(cap);

    let kept: HashSet<&str> = recommendations
        .iter()
        .map(|c| c.entry.url.as_str())
        .collect();

    let mut ranked: Vec<&ScoredCandidate<'r>> = candidates.iter().collect();
    ranked.sort_by(|a, b| rank_order(a.score, a.position, b.score, b.position));
    let blocked = ranked
        .into_iter()
        .filter(|c| !kept.contains(c.entry.url.as_str()))
        .take(BLOCKED_LIMIT)
        .map(|c| c.tagged(LinkReason::CapReached))
        .collect();

    debug!(
        "{} ({}): {} candidates, {} recommended (cap {})",
        page.url,
        page.page_type,
        candidates.len(),
        recommendations.len(),
        cap
    );

    PageRecommendations {
        recommendations,
        blocked,
    }
}

/// Recommendations for a single page.
///
/// Vectorizes the whole registry; when running every page, build a
/// [`ProfileIndex`] once and call [`recommend`] instead. `page` does not
/// have to be part of `registry`.
pub fn build_recommendations<'r>(
    page: &ContentEntry,
    registry: &'r Registry,
    config: &RecommendationConfig,
) -> PageRecommendations<'r> {
    let index = ProfileIndex::build(registry);
    let profile = match index.position(&page.url) {
        Some(position) if index.entry(position) == page => index.profile(position).clone(),
        _ => build_vector(page),
    };
    recommend(page, &profile, &index, config)
}
