//! Dictionary consistency checks.

use std::{collections::BTreeMap, fmt};

use crate::{MatchingDictionary, TokenBucket};

/// A non-fatal problem with a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryWarning {
    /// The same token sits in more than one bucket.
    TokenInMultipleBuckets {
        /// The shared token.
        token: String,
        /// Buckets holding it, in scoring order.
        buckets: Vec<TokenBucket>,
    },
    /// A product-line mapping exists for a token that is not a positive token.
    ProductLineWithoutPositive {
        /// The mapped token.
        token: String,
    },
    /// Ambiguous tokens exist but no anchors can ever activate them.
    AmbiguousWithoutAnchors,
    /// The dictionary has no positive tokens, so nothing can be a core match.
    NoPositiveTokens,
}

impl fmt::Display for DictionaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenInMultipleBuckets { token, buckets } => {
                let names: Vec<_> = buckets.iter().map(|b| b.as_str()).collect();
                write!(f, "token '{token}' appears in buckets: {}", names.join(", "))
            }
            Self::ProductLineWithoutPositive { token } => {
                write!(f, "product lines are mapped for '{token}', which is not a positive token")
            }
            Self::AmbiguousWithoutAnchors => {
                write!(f, "ambiguous tokens are defined but there are no anchor tokens")
            }
            Self::NoPositiveTokens => write!(f, "no positive tokens are defined"),
        }
    }
}

impl MatchingDictionary {
    /// Checks the dictionary and returns any warnings.
    pub fn validate(&self) -> Vec<DictionaryWarning> {
        let mut warnings = Vec::new();

        if self.positive_tokens.is_empty() {
            warnings.push(DictionaryWarning::NoPositiveTokens);
        }
        if !self.ambiguous_tokens.is_empty() && self.anchor_tokens.is_empty() {
            warnings.push(DictionaryWarning::AmbiguousWithoutAnchors);
        }

        let mut seen: BTreeMap<&str, Vec<TokenBucket>> = BTreeMap::new();
        for bucket in TokenBucket::ALL {
            for entry in self.bucket(bucket) {
                seen.entry(entry.token.as_str()).or_default().push(bucket);
            }
        }
        for (token, buckets) in seen {
            if buckets.len() > 1 {
                warnings.push(DictionaryWarning::TokenInMultipleBuckets {
                    token: token.to_string(),
                    buckets,
                });
            }
        }

        for token in self.product_line_map.keys() {
            if !self.positive_tokens.iter().any(|e| &e.token == token) {
                warnings.push(DictionaryWarning::ProductLineWithoutPositive {
                    token: token.clone(),
                });
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProductLine, TokenEntry};

    fn add(dict: &mut MatchingDictionary, bucket: TokenBucket, token: &str) {
        dict.add_token(bucket, TokenEntry::new(token)).unwrap();
    }

    #[test]
    fn clean_dictionary_has_no_warnings() {
        let mut dict = MatchingDictionary::new();
        add(&mut dict, TokenBucket::Brand, "acme");
        add(&mut dict, TokenBucket::Positive, "twister");
        add(&mut dict, TokenBucket::Ambiguous, "spindle");
        add(&mut dict, TokenBucket::Anchor, "yarn");
        dict.set_product_lines("twister", &[ProductLine::Twisting])
            .unwrap();
        assert!(dict.validate().is_empty());
    }

    #[test]
    fn empty_dictionary_warns_about_positives() {
        assert_eq!(
            MatchingDictionary::new().validate(),
            vec![DictionaryWarning::NoPositiveTokens]
        );
    }

    #[test]
    fn reports_cross_bucket_tokens() {
        let mut dict = MatchingDictionary::new();
        add(&mut dict, TokenBucket::Positive, "acme");
        add(&mut dict, TokenBucket::Brand, "acme");
        assert_eq!(
            dict.validate(),
            vec![DictionaryWarning::TokenInMultipleBuckets {
                token: "acme".into(),
                buckets: vec![TokenBucket::Brand, TokenBucket::Positive],
            }]
        );
    }

    #[test]
    fn reports_orphan_mapping_and_missing_anchors() {
        let mut dict = MatchingDictionary::new();
        add(&mut dict, TokenBucket::Positive, "twister");
        add(&mut dict, TokenBucket::Ambiguous, "spindle");
        dict.set_product_lines("winder", &[ProductLine::Winding])
            .unwrap();

        let warnings = dict.validate();
        assert!(warnings.contains(&DictionaryWarning::AmbiguousWithoutAnchors));
        assert!(warnings.contains(&DictionaryWarning::ProductLineWithoutPositive {
            token: "winder".into()
        }));
    }

    #[test]
    fn warning_display() {
        let w = DictionaryWarning::TokenInMultipleBuckets {
            token: "acme".into(),
            buckets: vec![TokenBucket::Brand, TokenBucket::Negative],
        };
        assert_eq!(w.to_string(), "token 'acme' appears in buckets: brand, negative");
    }
}
