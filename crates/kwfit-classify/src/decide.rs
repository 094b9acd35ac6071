//! The fit decision table and product-line assignment.

use std::{collections::BTreeSet, fmt, str::FromStr};

use kwfit_config::ScoringSettings;
use kwfit_dictionary::ProductLine;
use serde::{Deserialize, Serialize};

use crate::{CompiledDictionary, Signals};

/// Categorical verdict of a keyword's relevance to a client's offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitStatus {
    /// Relevant to the offering.
    CoreMatch,
    /// Mentions the client's brand.
    BrandKw,
    /// Not relevant.
    NoMatch,
    /// Needs a human decision.
    Review,
    /// The keyword was empty after normalization.
    Blank,
}

impl FitStatus {
    /// Every status, in report order.
    pub const ALL: [Self; 5] = [
        Self::CoreMatch,
        Self::BrandKw,
        Self::Review,
        Self::NoMatch,
        Self::Blank,
    ];

    /// Returns the stored (wire) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CoreMatch => "CORE_MATCH",
            Self::BrandKw => "BRAND_KW",
            Self::NoMatch => "NO_MATCH",
            Self::Review => "REVIEW",
            Self::Blank => "BLANK",
        }
    }

    /// Returns true for statuses that receive a product line.
    pub fn is_match(self) -> bool {
        matches!(self, Self::CoreMatch | Self::BrandKw)
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| format!("unknown fit status '{s}'"))
    }
}

/// Maps signals to a fit status.
///
/// Rows are evaluated top to bottom and the first one that holds wins:
///
/// | Condition                                  | Status       |
/// |--------------------------------------------|--------------|
/// | hard negative matched                      | `NO_MATCH`   |
/// | score >= brand threshold                   | `BRAND_KW`   |
/// | score < negative floor                     | `NO_MATCH`   |
/// | no negatives and score >= core threshold   | `CORE_MATCH` |
/// | negatives present                          | `NO_MATCH`   |
/// | no negatives and score > review threshold  | `REVIEW`     |
/// | no positive and no ambiguous matches       | `NO_MATCH`   |
/// | otherwise                                  | `REVIEW`     |
///
/// The sixth row catches scores between the review and core thresholds, such as a lone
/// anchored ambiguous token.
pub fn decide(signals: &Signals, thresholds: &ScoringSettings) -> FitStatus {
    let score = signals.score;
    let has_negatives = !signals.negative.is_empty();

    if signals.is_vetoed() {
        FitStatus::NoMatch
    } else if score >= thresholds.brand_threshold {
        FitStatus::BrandKw
    } else if score < thresholds.negative_floor {
        FitStatus::NoMatch
    } else if !has_negatives && score >= thresholds.core_threshold {
        FitStatus::CoreMatch
    } else if has_negatives {
        FitStatus::NoMatch
    } else if score > thresholds.review_threshold {
        FitStatus::Review
    } else if signals.positive.is_empty() && signals.ambiguous.is_empty() {
        FitStatus::NoMatch
    } else {
        FitStatus::Review
    }
}

/// Assigns a product line for a decided keyword.
///
/// Only core matches and brand keywords receive a line. Distinct lines mapped to the
/// matched positive tokens decide it: one line is assigned directly, several become
/// `MULTIPLE`, and none leaves `NONE` (or `BRAND_KW` for brand keywords).
pub fn assign_product_line(
    status: FitStatus,
    signals: &Signals,
    dictionary: &CompiledDictionary,
) -> ProductLine {
    if !status.is_match() {
        return ProductLine::None;
    }

    let lines: BTreeSet<ProductLine> = signals
        .positive
        .iter()
        .flat_map(|token| dictionary.product_lines(token).iter().copied())
        .collect();

    let mut iter = lines.into_iter();
    match (iter.next(), iter.next()) {
        (Some(line), None) => line,
        (Some(_), Some(_)) => ProductLine::Multiple,
        (None, _) if status == FitStatus::BrandKw => ProductLine::BrandKw,
        (None, _) => ProductLine::None,
    }
}
