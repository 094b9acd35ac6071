//! Dictionaries compiled for repeated matching.

use std::collections::BTreeMap;

use kwfit_config::MatchingSettings;
use kwfit_dictionary::{MatchingDictionary, ProductLine, TokenEntry};

use crate::{ClassifyError, TokenMatcher};

/// A [`MatchingDictionary`] with every token compiled into a [`TokenMatcher`].
///
/// Bucket order is preserved, so the first matching hard negative is always the same one.
#[derive(Debug, Clone)]
pub struct CompiledDictionary {
    /// Brand matchers.
    pub(crate) brand: Vec<TokenMatcher>,
    /// Positive matchers.
    pub(crate) positive: Vec<TokenMatcher>,
    /// Hard negative matchers, in dictionary order.
    pub(crate) hard_negative: Vec<TokenMatcher>,
    /// Soft negative matchers.
    pub(crate) negative: Vec<TokenMatcher>,
    /// Ambiguous matchers.
    pub(crate) ambiguous: Vec<TokenMatcher>,
    /// Anchor matchers.
    pub(crate) anchor: Vec<TokenMatcher>,
    /// Ignore matchers.
    pub(crate) ignore: Vec<TokenMatcher>,
    /// Positive token -> product lines.
    product_lines: BTreeMap<String, Vec<ProductLine>>,
}

impl CompiledDictionary {
    /// Compiles every bucket of a dictionary.
    pub fn compile(
        dictionary: &MatchingDictionary,
        settings: &MatchingSettings,
    ) -> Result<Self, ClassifyError> {
        let cutoff = settings.short_token_length;
        let compile = |entries: &[TokenEntry]| -> Result<Vec<TokenMatcher>, ClassifyError> {
            entries
                .iter()
                .map(|e| TokenMatcher::from_entry(e, cutoff))
                .collect()
        };

        let (hard_negative, negative): (Vec<_>, Vec<_>) = compile(&dictionary.negative_tokens)?
            .into_iter()
            .partition(TokenMatcher::is_hard_negative);

        Ok(Self {
            brand: compile(&dictionary.brand_tokens)?,
            positive: compile(&dictionary.positive_tokens)?,
            hard_negative,
            negative,
            ambiguous: compile(&dictionary.ambiguous_tokens)?,
            anchor: compile(&dictionary.anchor_tokens)?,
            ignore: compile(&dictionary.ignore_tokens)?,
            product_lines: dictionary.product_line_map.clone(),
        })
    }

    /// Product lines mapped to a positive token.
    pub fn product_lines(&self, token: &str) -> &[ProductLine] {
        self.product_lines
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of compiled matchers.
    pub fn len(&self) -> usize {
        [
            &self.brand,
            &self.positive,
            &self.hard_negative,
            &self.negative,
            &self.ambiguous,
            &self.anchor,
            &self.ignore,
        ]
        .iter()
        .map(|bucket| bucket.len())
        .sum()
    }

    /// Returns true if the dictionary has no tokens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tokens of every matcher in `bucket` that match `text`, in bucket order.
pub(crate) fn matching_tokens(bucket: &[TokenMatcher], text: &str) -> Vec<String> {
    bucket
        .iter()
        .filter(|m| m.is_match(text))
        .map(|m| m.token().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use kwfit_dictionary::TokenBucket;

    use super::*;

    #[test]
    fn negatives_split_by_flag_in_order() {
        let mut dict = MatchingDictionary::new();
        for (token, hard) in [("toy", true), ("rug", false), ("game", true)] {
            let mut entry = TokenEntry::new(token);
            entry.is_hard_negative = hard;
            dict.add_token(TokenBucket::Negative, entry).unwrap();
        }

        let compiled = CompiledDictionary::compile(&dict, &MatchingSettings::default()).unwrap();
        let hard: Vec<_> = compiled.hard_negative.iter().map(TokenMatcher::token).collect();
        let soft: Vec<_> = compiled.negative.iter().map(TokenMatcher::token).collect();
        assert_eq!(hard, vec!["toy", "game"]);
        assert_eq!(soft, vec!["rug"]);
        assert_eq!(compiled.len(), 3);
    }

    #[test]
    fn matching_tokens_keeps_bucket_order() {
        let bucket = vec![
            TokenMatcher::new("winder", 4).unwrap(),
            TokenMatcher::new("yarn", 4).unwrap(),
            TokenMatcher::new("spool", 4).unwrap(),
        ];
        assert_eq!(
            matching_tokens(&bucket, "yarn winder"),
            vec!["winder".to_string(), "yarn".to_string()]
        );
    }

    #[test]
    fn empty_dictionary_compiles() {
        let compiled =
            CompiledDictionary::compile(&MatchingDictionary::new(), &MatchingSettings::default())
                .unwrap();
        assert!(compiled.is_empty());
        assert!(compiled.product_lines("twister").is_empty());
    }
}
