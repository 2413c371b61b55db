// Content Entry
//
// *L'Entrée* (The Entry) - Page types, locales and the registry record of one page

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of content page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// Top-level topic hub aggregating several clusters.
    Pillar,
    /// Single topic article nested under one pillar.
    Cluster,
    /// Interactive, non-article page.
    Tool,
    /// Policy or evidence page.
    Trust,
    /// Anything else.
    Other,
}

impl PageType {
    /// All page types in declaration order.
    pub const ALL: [PageType; 5] = [
        PageType::Pillar,
        PageType::Cluster,
        PageType::Tool,
        PageType::Trust,
        PageType::Other,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Pillar => "pillar",
            PageType::Cluster => "cluster",
            PageType::Tool => "tool",
            PageType::Trust => "trust",
            PageType::Other => "other",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience locale of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Locale {
    /// United Kingdom audience.
    Uk,
    /// United States audience.
    Us,
    /// Locale-neutral page.
    Global,
}

impl Locale {
    /// Uppercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Uk => "UK",
            Locale::Us => "US",
            Locale::Global => "GLOBAL",
        }
    }

    /// Whether a page in `self` may link to a page in `other`.
    ///
    /// `GLOBAL` pages are compatible with everything; two regional pages
    /// only when their locales match.
    pub fn is_compatible_with(self, other: Locale) -> bool {
        match (self, other) {
            (Locale::Global, _) | (_, Locale::Global) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single content page as emitted by the registry builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    /// Unique page URL.
    pub url: String,

    /// Page kind.
    #[serde(rename = "type")]
    pub page_type: PageType,

    /// Audience locale.
    pub locale: Locale,

    /// Page title.
    pub title: String,

    /// Meta description.
    #[serde(default)]
    pub description: String,

    /// Visible heading.
    #[serde(default)]
    pub h1: String,

    /// Editorial tags, used verbatim by the vectorizer.
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Topic-cluster key this page belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_pillar: Option<String>,

    /// Optional longer summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ContentEntry {
    /// Create an entry with empty optional fields.
    pub fn new(
        url: impl Into<String>,
        page_type: PageType,
        locale: Locale,
        title: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            page_type,
            locale,
            title: title.into(),
            description: String::new(),
            h1: String::new(),
            tags: BTreeSet::new(),
            primary_pillar: None,
            summary: None,
        }
    }

    /// Set the meta description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the visible heading.
    pub fn with_h1(mut self, h1: impl Into<String>) -> Self {
        self.h1 = h1.into();
        self
    }

    /// Add tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the primary pillar key.
    pub fn with_pillar(mut self, pillar: impl Into<String>) -> Self {
        self.primary_pillar = Some(pillar.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Primary pillar key, treating an empty string as absent.
    pub fn pillar(&self) -> Option<&str> {
        self.primary_pillar.as_deref().filter(|p| !p.is_empty())
    }

    /// True when both pages carry the same non-empty pillar key.
    ///
    /// Only the scoring bonus uses this; pool membership uses [`Self::same_pillar_as`].
    pub fn shares_pillar_with(&self, other: &ContentEntry) -> bool {
        match (self.pillar(), other.pillar()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// True when the pillar keys are equal, absent included: two pages
    /// without a pillar sit under the same (missing) pillar.
    pub fn same_pillar_as(&self, other: &ContentEntry) -> bool {
        self.pillar() == other.pillar()
    }

    /// True when the pages sit under different pillars (absent counts as a value).
    pub fn differs_in_pillar_from(&self, other: &ContentEntry) -> bool {
        !self.same_pillar_as(other)
    }
}

/// Strip a single trailing slash, leaving the root URL `/` untouched.
pub fn normalise_url(url: &str) -> &str {
    if url.len() > 1 {
        url.strip_suffix('/').unwrap_or(url)
    } else {
        url
    }
}
