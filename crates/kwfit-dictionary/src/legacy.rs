//! The flat legacy dictionary shape and its migration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    CURRENT_VERSION, DictionaryError, MatchingDictionary, ProductLine, TokenBucket, TokenEntry,
    TokenSource,
};

/// A dictionary in the original flat shape: plain strings per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyDictionary {
    /// Brand names.
    pub brand_terms: Vec<String>,
    /// Offering terms.
    pub positive_terms: Vec<String>,
    /// Soft negative terms.
    pub negative_terms: Vec<String>,
    /// Negative terms that veto a match.
    pub hard_negative_terms: Vec<String>,
    /// Term -> product line names.
    pub product_lines: BTreeMap<String, Vec<String>>,
}

impl LegacyDictionary {
    /// Converts to the current shape.
    ///
    /// Every term becomes a client-scoped entry sourced as legacy. Hard negative terms
    /// become flagged negative entries. Terms that normalize to nothing are dropped, as
    /// are product line names that do not parse to a concrete line.
    pub fn migrate(&self) -> MatchingDictionary {
        let mut dict = MatchingDictionary::new();

        let groups = [
            (TokenBucket::Brand, &self.brand_terms, false),
            (TokenBucket::Positive, &self.positive_terms, false),
            (TokenBucket::Negative, &self.negative_terms, false),
            (TokenBucket::Negative, &self.hard_negative_terms, true),
        ];
        for (bucket, terms, hard) in groups {
            for term in terms {
                let mut entry = TokenEntry::new(term).with_source(TokenSource::Legacy);
                entry.is_hard_negative = hard;
                // Only empty terms can fail here; they are dropped
                dict.add_token(bucket, entry).unwrap_or_default();
            }
        }

        for (term, names) in &self.product_lines {
            let lines: Vec<ProductLine> = names
                .iter()
                .filter_map(|name| name.parse::<ProductLine>().ok())
                .filter(|line| line.is_concrete())
                .collect();
            if !lines.is_empty() {
                dict.set_product_lines(term, &lines).unwrap_or_default();
            }
        }

        dict
    }
}

/// A dictionary as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDictionary {
    /// The dictionary in the current shape.
    pub dictionary: MatchingDictionary,
    /// True when the stored form was legacy, an older version or not canonical, and should
    /// be written back.
    pub migrated: bool,
}

/// Parses a stored dictionary, migrating the legacy shape.
///
/// Documents carrying a `version` key are read as [`MatchingDictionary`]; anything else is
/// read as [`LegacyDictionary`] and migrated.
pub fn parse_dictionary(json: &str) -> Result<LoadedDictionary, DictionaryError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let Some(version) = value.get("version") else {
        let legacy: LegacyDictionary = serde_json::from_value(value)?;
        return Ok(LoadedDictionary {
            dictionary: legacy.migrate(),
            migrated: true,
        });
    };

    let version = version.as_u64().unwrap_or(0);
    if version > CURRENT_VERSION {
        return Err(DictionaryError::UnsupportedVersion { version });
    }

    let stored: MatchingDictionary = serde_json::from_value(value)?;
    let mut dictionary = stored.canonicalized();
    let changed = dictionary != stored;
    dictionary.version = CURRENT_VERSION;
    Ok(LoadedDictionary {
        dictionary,
        migrated: changed || version != CURRENT_VERSION,
    })
}
