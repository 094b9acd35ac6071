//! Fixed component score tables and business relevance inference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PageIntent, PageType};

/// How directly a page serves the client's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessRelevance {
    /// Sells the offering directly.
    Direct,
    /// Closely supports a sale.
    High,
    /// Supports research ahead of a sale.
    Medium,
    /// Tangential.
    Low,
    /// Not worth optimizing.
    None,
}

impl BusinessRelevance {
    /// Component score on a 0-100 scale.
    pub fn score(self) -> f64 {
        match self {
            Self::Direct => 100.0,
            Self::High => 75.0,
            Self::Medium => 50.0,
            Self::Low => 25.0,
            Self::None => 0.0,
        }
    }

    /// Returns the stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "DIRECT",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for BusinessRelevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PageIntent {
    /// Component score on a 0-100 scale.
    pub fn score(self) -> f64 {
        match self {
            Self::Transactional => 100.0,
            Self::Commercial => 85.0,
            Self::Informational => 60.0,
            Self::Navigational => 40.0,
            Self::Support => 30.0,
            Self::Unknown => 10.0,
        }
    }
}

impl PageType {
    /// Component score on a 0-100 scale.
    pub fn score(self) -> f64 {
        match self {
            Self::Product => 100.0,
            Self::Service => 95.0,
            Self::Category => 85.0,
            Self::Landing => 80.0,
            Self::Comparison => 75.0,
            Self::Homepage => 70.0,
            Self::CaseStudy => 65.0,
            Self::Blog => 55.0,
            Self::Resource => 50.0,
            Self::Contact => 40.0,
            Self::About => 30.0,
            Self::Other => 20.0,
            Self::Legal => 5.0,
        }
    }
}

/// Infers business relevance. The first matching rule wins.
pub fn infer_relevance(
    intent: PageIntent,
    page_type: PageType,
    is_seo_relevant: bool,
) -> BusinessRelevance {
    use PageType::{Blog, CaseStudy, Category, Comparison, Landing, Legal, Product, Resource, Service};

    if !is_seo_relevant || page_type == Legal {
        return BusinessRelevance::None;
    }
    match page_type {
        Product | Service if intent.is_buying() => BusinessRelevance::Direct,
        Product | Service | Category | Landing => BusinessRelevance::High,
        _ if intent.is_buying() => BusinessRelevance::High,
        Comparison | CaseStudy | Blog | Resource => BusinessRelevance::Medium,
        _ if intent == PageIntent::Informational => BusinessRelevance::Medium,
        _ => BusinessRelevance::Low,
    }
}
