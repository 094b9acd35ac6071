//! Crawled page records.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PriorityTier;

/// What a visitor landing on the page is trying to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageIntent {
    /// Ready to buy.
    Transactional,
    /// Researching a purchase.
    Commercial,
    /// Looking for information.
    Informational,
    /// Looking for a specific site or page.
    Navigational,
    /// Seeking help with something already bought.
    Support,
    /// Not classified.
    #[default]
    #[serde(other)]
    Unknown,
}

/// The role a page plays on its site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageType {
    /// A single product.
    Product,
    /// A single service.
    Service,
    /// A product or service listing.
    Category,
    /// A campaign landing page.
    Landing,
    /// A comparison against alternatives.
    Comparison,
    /// The site root.
    Homepage,
    /// A customer story.
    CaseStudy,
    /// A blog post.
    Blog,
    /// A guide, whitepaper or download.
    Resource,
    /// A contact page.
    Contact,
    /// An about page.
    About,
    /// Terms, privacy and similar.
    Legal,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

impl PageIntent {
    /// Every intent.
    pub const ALL: [Self; 6] = [
        Self::Transactional,
        Self::Commercial,
        Self::Informational,
        Self::Navigational,
        Self::Support,
        Self::Unknown,
    ];

    /// Returns the stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transactional => "TRANSACTIONAL",
            Self::Commercial => "COMMERCIAL",
            Self::Informational => "INFORMATIONAL",
            Self::Navigational => "NAVIGATIONAL",
            Self::Support => "SUPPORT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for purchase-oriented intents.
    pub fn is_buying(self) -> bool {
        matches!(self, Self::Transactional | Self::Commercial)
    }
}

impl PageType {
    /// Every page type.
    pub const ALL: [Self; 13] = [
        Self::Product,
        Self::Service,
        Self::Category,
        Self::Landing,
        Self::Comparison,
        Self::Homepage,
        Self::CaseStudy,
        Self::Blog,
        Self::Resource,
        Self::Contact,
        Self::About,
        Self::Other,
        Self::Legal,
    ];

    /// Returns the stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "PRODUCT",
            Self::Service => "SERVICE",
            Self::Category => "CATEGORY",
            Self::Landing => "LANDING",
            Self::Comparison => "COMPARISON",
            Self::Homepage => "HOMEPAGE",
            Self::CaseStudy => "CASE_STUDY",
            Self::Blog => "BLOG",
            Self::Resource => "RESOURCE",
            Self::Contact => "CONTACT",
            Self::About => "ABOUT",
            Self::Other => "OTHER",
            Self::Legal => "LEGAL",
        }
    }
}

impl fmt::Display for PageIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| format!("unknown page intent '{s}'"))
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| format!("unknown page type '{s}'"))
    }
}

/// Default for the SEO-relevance flag when a record omits it.
fn default_seo_relevant() -> bool {
    true
}

/// One crawled page.
///
/// Fields this crate does not know about are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPageRecord {
    /// Unique page id within a batch.
    pub id: String,
    /// Page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Estimated traffic value from the SEO data provider.
    #[serde(default, rename = "estTrafficETV", alias = "estTrafficEtv")]
    pub est_traffic_etv: Option<f64>,
    /// Classified page intent.
    #[serde(default)]
    pub page_intent: PageIntent,
    /// Classified page type.
    #[serde(default)]
    pub page_type: PageType,
    /// Whether the page is worth optimizing at all.
    #[serde(default = "default_seo_relevant")]
    pub is_seo_relevant: bool,
    /// Composite priority score, once scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
    /// Priority tier, once scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_tier: Option<PriorityTier>,
    /// Unrelated fields carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DomainPageRecord {
    /// Creates a record with the given id and defaults elsewhere.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
            est_traffic_etv: None,
            page_intent: PageIntent::Unknown,
            page_type: PageType::Other,
            is_seo_relevant: true,
            priority_score: None,
            priority_tier: None,
            extra: Map::new(),
        }
    }

    /// Estimated traffic value, with missing values read as zero.
    pub fn etv(&self) -> f64 {
        self.est_traffic_etv.unwrap_or(0.0)
    }
}
