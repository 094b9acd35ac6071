//! The categorized token dictionary and its editing operations.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{DictionaryError, ProductLine, TokenEntry, TokenSource, normalize};

/// Dictionary schema version written by this build.
pub const CURRENT_VERSION: u64 = 2;

/// The buckets a token can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBucket {
    /// Client brand names.
    Brand,
    /// Terms describing the client's offering.
    Positive,
    /// Terms that push a keyword away from the offering.
    Negative,
    /// Terms that only count when an anchor is also present.
    Ambiguous,
    /// Context terms that activate ambiguous tokens.
    Anchor,
    /// Terms that are recognized but carry no weight.
    Ignore,
}

impl TokenBucket {
    /// Every bucket, in scoring order.
    pub const ALL: [Self; 6] = [
        Self::Brand,
        Self::Positive,
        Self::Negative,
        Self::Ambiguous,
        Self::Anchor,
        Self::Ignore,
    ];

    /// Returns the bucket name as used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Ambiguous => "ambiguous",
            Self::Anchor => "anchor",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for TokenBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let singular = key.strip_suffix('s').unwrap_or(&key);
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == key || bucket.as_str() == singular)
            .ok_or_else(|| {
                format!(
                    "unknown bucket '{s}' (expected one of: brand, positive, negative, ambiguous, anchor, ignore)"
                )
            })
    }
}

/// Outcome of a bulk token import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkAddSummary {
    /// Tokens that were added.
    pub added: usize,
    /// Tokens already present in the bucket.
    pub duplicates: usize,
    /// Raw inputs that normalized to nothing.
    pub rejected: Vec<String>,
}

/// A client's token dictionary.
///
/// Every token is stored normalized. Uniqueness holds per bucket; a token may sit in more
/// than one bucket, which [`MatchingDictionary::validate`] reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingDictionary {
    /// Schema version.
    pub version: u64,
    /// Brand tokens.
    #[serde(default)]
    pub brand_tokens: Vec<TokenEntry>,
    /// Positive tokens.
    #[serde(default)]
    pub positive_tokens: Vec<TokenEntry>,
    /// Negative tokens, some flagged as hard negatives.
    #[serde(default)]
    pub negative_tokens: Vec<TokenEntry>,
    /// Ambiguous tokens.
    #[serde(default)]
    pub ambiguous_tokens: Vec<TokenEntry>,
    /// Anchor tokens.
    #[serde(default)]
    pub anchor_tokens: Vec<TokenEntry>,
    /// Ignore tokens.
    #[serde(default)]
    pub ignore_tokens: Vec<TokenEntry>,
    /// Positive token -> implied product lines.
    #[serde(default)]
    pub product_line_map: BTreeMap<String, Vec<ProductLine>>,
}

impl Default for MatchingDictionary {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            brand_tokens: Vec::new(),
            positive_tokens: Vec::new(),
            negative_tokens: Vec::new(),
            ambiguous_tokens: Vec::new(),
            anchor_tokens: Vec::new(),
            ignore_tokens: Vec::new(),
            product_line_map: BTreeMap::new(),
        }
    }
}

impl MatchingDictionary {
    /// Creates an empty dictionary at the current version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entries of a bucket in insertion order.
    pub fn bucket(&self, bucket: TokenBucket) -> &[TokenEntry] {
        match bucket {
            TokenBucket::Brand => &self.brand_tokens,
            TokenBucket::Positive => &self.positive_tokens,
            TokenBucket::Negative => &self.negative_tokens,
            TokenBucket::Ambiguous => &self.ambiguous_tokens,
            TokenBucket::Anchor => &self.anchor_tokens,
            TokenBucket::Ignore => &self.ignore_tokens,
        }
    }

    /// Mutable access to a bucket.
    fn bucket_mut(&mut self, bucket: TokenBucket) -> &mut Vec<TokenEntry> {
        match bucket {
            TokenBucket::Brand => &mut self.brand_tokens,
            TokenBucket::Positive => &mut self.positive_tokens,
            TokenBucket::Negative => &mut self.negative_tokens,
            TokenBucket::Ambiguous => &mut self.ambiguous_tokens,
            TokenBucket::Anchor => &mut self.anchor_tokens,
            TokenBucket::Ignore => &mut self.ignore_tokens,
        }
    }

    /// Returns true if the bucket holds the (normalized) token.
    pub fn contains(&self, bucket: TokenBucket, token: &str) -> bool {
        let token = normalize(token);
        self.bucket(bucket).iter().any(|e| e.token == token)
    }

    /// Adds an entry to a bucket.
    ///
    /// The token is normalized first. Returns `Ok(false)` when the bucket already holds the
    /// token; adding a hard-negative entry over an existing soft negative upgrades it and
    /// counts as a change.
    pub fn add_token(
        &mut self,
        bucket: TokenBucket,
        mut entry: TokenEntry,
    ) -> Result<bool, DictionaryError> {
        if entry.is_hard_negative && bucket != TokenBucket::Negative {
            return Err(DictionaryError::HardNegativeOutsideNegatives { bucket });
        }
        let normalized = normalize(&entry.token);
        if normalized.is_empty() {
            return Err(DictionaryError::EmptyToken { raw: entry.token });
        }
        entry.token = normalized;

        let entries = self.bucket_mut(bucket);
        if let Some(existing) = entries.iter_mut().find(|e| e.token == entry.token) {
            if entry.is_hard_negative && !existing.is_hard_negative {
                existing.is_hard_negative = true;
                return Ok(true);
            }
            return Ok(false);
        }
        entries.push(entry);
        Ok(true)
    }

    /// Removes a token from a bucket. Returns true if it was present.
    ///
    /// Removing a positive token also drops its product-line mapping.
    pub fn remove_token(&mut self, bucket: TokenBucket, token: &str) -> bool {
        let token = normalize(token);
        let entries = self.bucket_mut(bucket);
        let before = entries.len();
        entries.retain(|e| e.token != token);
        let removed = entries.len() != before;

        if removed && bucket == TokenBucket::Positive {
            self.product_line_map.remove(&token);
        }
        removed
    }

    /// Adds many raw tokens to one bucket with the given source.
    pub fn bulk_add<I, S>(
        &mut self,
        bucket: TokenBucket,
        tokens: I,
        source: TokenSource,
    ) -> BulkAddSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = BulkAddSummary::default();
        for raw in tokens {
            let raw = raw.as_ref();
            let entry = TokenEntry::new(raw).with_source(source);
            match self.add_token(bucket, entry) {
                Ok(true) => summary.added += 1,
                Ok(false) => summary.duplicates += 1,
                Err(_) => summary.rejected.push(raw.to_string()),
            }
        }
        summary
    }

    /// Maps a token to product lines. An empty list removes the mapping.
    ///
    /// Only concrete lines are accepted; lines are stored sorted and de-duplicated.
    pub fn set_product_lines(
        &mut self,
        token: &str,
        lines: &[ProductLine],
    ) -> Result<(), DictionaryError> {
        let key = normalize(token);
        if key.is_empty() {
            return Err(DictionaryError::EmptyToken {
                raw: token.to_string(),
            });
        }
        if let Some(&line) = lines.iter().find(|l| !l.is_concrete()) {
            return Err(DictionaryError::NonConcreteProductLine { line });
        }

        if lines.is_empty() {
            self.product_line_map.remove(&key);
            return Ok(());
        }
        let mut lines = lines.to_vec();
        lines.sort();
        lines.dedup();
        self.product_line_map.insert(key, lines);
        Ok(())
    }

    /// Rebuilds the dictionary through the editing operations.
    ///
    /// Stored documents may have been written by other tools. Tokens and map keys are
    /// normalized, per-bucket duplicates collapse into the first entry, empty tokens are
    /// dropped, and a hard flag outside the negative bucket is cleared. Map keys that
    /// normalize to the same token have their lines combined.
    pub fn canonicalized(&self) -> Self {
        let mut dict = Self {
            version: self.version,
            ..Self::default()
        };

        for bucket in TokenBucket::ALL {
            for entry in self.bucket(bucket) {
                let mut entry = entry.clone();
                if bucket != TokenBucket::Negative {
                    entry.is_hard_negative = false;
                }
                // Only empty tokens can fail here; they are dropped
                dict.add_token(bucket, entry).unwrap_or_default();
            }
        }

        let mut lines: BTreeMap<String, Vec<ProductLine>> = BTreeMap::new();
        for (token, mapped) in &self.product_line_map {
            let key = normalize(token);
            if key.is_empty() {
                continue;
            }
            let slot = lines.entry(key).or_default();
            slot.extend(mapped.iter().copied().filter(|line| line.is_concrete()));
        }
        for (token, mapped) in lines {
            dict.set_product_lines(&token, &mapped).unwrap_or_default();
        }

        dict
    }

    /// Product lines mapped to an already-normalized token.
    pub fn product_lines(&self, token: &str) -> &[ProductLine] {
        self.product_line_map
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Negative entries flagged as hard negatives, in dictionary order.
    pub fn hard_negatives(&self) -> impl Iterator<Item = &TokenEntry> {
        self.negative_tokens.iter().filter(|e| e.is_hard_negative)
    }

    /// Total number of entries across all buckets.
    pub fn token_count(&self) -> usize {
        TokenBucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }

    /// Returns true if no bucket holds any token.
    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_parse_accepts_plurals() {
        assert_eq!("brand".parse(), Ok(TokenBucket::Brand));
        assert_eq!("Negatives".parse(), Ok(TokenBucket::Negative));
        assert_eq!(" anchor ".parse(), Ok(TokenBucket::Anchor));
        assert_eq!("ambiguous".parse(), Ok(TokenBucket::Ambiguous));
        assert!("hard".parse::<TokenBucket>().is_err());
    }

    #[test]
    fn add_normalizes_and_dedupes() {
        let mut dict = MatchingDictionary::new();
        assert!(dict.add_token(TokenBucket::Positive, TokenEntry::new("Yarn Twister")).unwrap());
        assert!(!dict.add_token(TokenBucket::Positive, TokenEntry::new("yarn   twister")).unwrap());
        assert_eq!(dict.positive_tokens.len(), 1);
        assert_eq!(dict.positive_tokens[0].token, "yarn twister");
        assert!(dict.contains(TokenBucket::Positive, "YARN-twister"));
    }

    #[test]
    fn same_token_in_two_buckets_is_allowed() {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Brand, TokenEntry::new("acme")).unwrap();
        dict.add_token(TokenBucket::Positive, TokenEntry::new("acme")).unwrap();
        assert_eq!(dict.token_count(), 2);
    }

    #[test]
    fn add_rejects_empty_token() {
        let mut dict = MatchingDictionary::new();
        let err = dict
            .add_token(TokenBucket::Brand, TokenEntry::new(" -- "))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::EmptyToken { .. }));
        assert!(dict.is_empty());
    }

    #[test]
    fn hard_negative_only_in_negative_bucket() {
        let mut dict = MatchingDictionary::new();
        let err = dict
            .add_token(TokenBucket::Positive, TokenEntry::new("toy").hard_negative())
            .unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::HardNegativeOutsideNegatives {
                bucket: TokenBucket::Positive
            }
        ));

        dict.add_token(TokenBucket::Negative, TokenEntry::new("toy").hard_negative())
            .unwrap();
        let hard: Vec<_> = dict.hard_negatives().map(|e| e.token.as_str()).collect();
        assert_eq!(hard, vec!["toy"]);
    }

    #[test]
    fn hard_flag_upgrades_existing_soft_negative() {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Negative, TokenEntry::new("toy")).unwrap();
        assert_eq!(dict.hard_negatives().count(), 0);

        assert!(
            dict.add_token(TokenBucket::Negative, TokenEntry::new("toy").hard_negative())
                .unwrap()
        );
        assert_eq!(dict.hard_negatives().count(), 1);
        assert_eq!(dict.negative_tokens.len(), 1);
    }

    #[test]
    fn remove_positive_drops_product_lines() {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Positive, TokenEntry::new("twister")).unwrap();
        dict.set_product_lines("twister", &[ProductLine::Twisting])
            .unwrap();

        assert!(dict.remove_token(TokenBucket::Positive, "Twister"));
        assert!(dict.product_lines("twister").is_empty());
        assert!(!dict.remove_token(TokenBucket::Positive, "twister"));
    }

    #[test]
    fn bulk_add_summarizes() {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Negative, TokenEntry::new("toy")).unwrap();

        let summary = dict.bulk_add(
            TokenBucket::Negative,
            ["Toy", "rug", "!!", "game", "RUG"],
            TokenSource::Ai,
        );
        assert_eq!(summary.added, 2);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(summary.rejected, vec!["!!".to_string()]);
        assert_eq!(dict.negative_tokens[1].source, TokenSource::Ai);
    }

    #[test]
    fn product_lines_sorted_and_concrete() {
        let mut dict = MatchingDictionary::new();
        dict.set_product_lines(
            "machine",
            &[ProductLine::Winding, ProductLine::Twisting, ProductLine::Winding],
        )
        .unwrap();
        assert_eq!(
            dict.product_lines("machine"),
            &[ProductLine::Twisting, ProductLine::Winding]
        );

        let err = dict
            .set_product_lines("machine", &[ProductLine::Multiple])
            .unwrap_err();
        assert!(matches!(err, DictionaryError::NonConcreteProductLine { .. }));

        dict.set_product_lines("machine", &[]).unwrap();
        assert!(dict.product_lines("machine").is_empty());
    }

    #[test]
    fn serde_uses_camel_case() {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Brand, TokenEntry::new("acme")).unwrap();
        dict.set_product_lines("twister", &[ProductLine::Twisting])
            .unwrap();

        let json = serde_json::to_value(&dict).unwrap();
        assert_eq!(json["version"], CURRENT_VERSION);
        assert_eq!(json["brandTokens"][0]["token"], "acme");
        assert_eq!(json["productLineMap"]["twister"][0], "TWISTING");
        assert!(json["ambiguousTokens"].as_array().unwrap().is_empty());
    }
}
