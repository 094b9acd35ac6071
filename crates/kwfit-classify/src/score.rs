//! Aggregating token matches into a score.

use kwfit_config::ScoringSettings;
use serde::Serialize;

use crate::{CompiledDictionary, compiled::matching_tokens};

/// Tokens that matched a keyword, per bucket, and the resulting score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    /// The hard negative that vetoed the keyword. When set, every other field is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_negative: Option<String>,
    /// Matched brand tokens.
    pub brand: Vec<String>,
    /// Matched positive tokens.
    pub positive: Vec<String>,
    /// Matched ambiguous tokens, whether or not they counted.
    pub ambiguous: Vec<String>,
    /// Matched anchor tokens.
    pub anchors: Vec<String>,
    /// Matched soft negative tokens.
    pub negative: Vec<String>,
    /// Matched ignore tokens.
    pub ignored: Vec<String>,
    /// Weighted sum of the contributions.
    pub score: f64,
}

impl Signals {
    /// Returns true when a hard negative vetoed the keyword.
    pub fn is_vetoed(&self) -> bool {
        self.hard_negative.is_some()
    }

    /// Returns true when ambiguous matches were validated by an anchor.
    pub fn is_anchored(&self) -> bool {
        !self.anchors.is_empty()
    }

    /// Returns true when nothing but ignore tokens matched.
    pub fn is_silent(&self) -> bool {
        self.hard_negative.is_none()
            && self.brand.is_empty()
            && self.positive.is_empty()
            && self.ambiguous.is_empty()
            && self.negative.is_empty()
    }
}

/// Scores a normalized keyword against a compiled dictionary.
///
/// The first hard negative (in dictionary order) that matches vetoes the keyword and no
/// other bucket is consulted. Otherwise every bucket contributes its weight once per
/// matched token; ambiguous tokens only contribute when at least one anchor matched, and
/// ignore tokens never contribute.
pub fn score(dictionary: &CompiledDictionary, keyword: &str, weights: &ScoringSettings) -> Signals {
    if let Some(veto) = dictionary.hard_negative.iter().find(|m| m.is_match(keyword)) {
        return Signals {
            hard_negative: Some(veto.token().to_string()),
            ..Signals::default()
        };
    }

    let brand = matching_tokens(&dictionary.brand, keyword);
    let positive = matching_tokens(&dictionary.positive, keyword);
    let ambiguous = matching_tokens(&dictionary.ambiguous, keyword);
    let anchors = matching_tokens(&dictionary.anchor, keyword);
    let negative = matching_tokens(&dictionary.negative, keyword);
    let ignored = matching_tokens(&dictionary.ignore, keyword);

    let counted_ambiguous = if anchors.is_empty() { 0 } else { ambiguous.len() };
    let score = brand.len() as f64 * weights.brand_weight
        + positive.len() as f64 * weights.positive_weight
        + counted_ambiguous as f64 * weights.ambiguous_weight
        + negative.len() as f64 * weights.negative_weight;

    Signals {
        hard_negative: None,
        brand,
        positive,
        ambiguous,
        anchors,
        negative,
        ignored,
        score,
    }
}
