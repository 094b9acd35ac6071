//! Token matching.
//!
//! Short tokens are prone to false positives as substrings ("rug" inside "drugs", "tie"
//! inside "industry"), so tokens below the configured length match only as whole words.
//! Longer tokens match anywhere in the text.

use std::borrow::Cow;

use kwfit_dictionary::TokenEntry;
use regex::{Regex, RegexBuilder};

use crate::ClassifyError;

/// How a compiled token is tested against text.
#[derive(Debug, Clone)]
enum MatchRule {
    /// The token is empty and never matches.
    Never,
    /// Case-insensitive whole-word match.
    WordBoundary(Regex),
    /// Case-insensitive substring containment.
    Substring,
}

/// A single token with its match rule decided up front.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    /// Lowercased token text.
    token: String,
    /// Match rule chosen from the token length.
    rule: MatchRule,
    /// Whether a match vetoes the classification.
    hard_negative: bool,
}

impl TokenMatcher {
    /// Compiles a matcher for a token.
    ///
    /// Tokens with fewer than `short_token_length` characters use word boundaries.
    pub fn new(token: &str, short_token_length: usize) -> Result<Self, ClassifyError> {
        let token = token.to_lowercase();
        let rule = if token.is_empty() {
            MatchRule::Never
        } else if token.chars().count() < short_token_length {
            let pattern = format!(r"\b{}\b", regex::escape(&token));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ClassifyError::InvalidToken {
                    token: token.clone(),
                    source,
                })?;
            MatchRule::WordBoundary(regex)
        } else {
            MatchRule::Substring
        };

        Ok(Self {
            token,
            rule,
            hard_negative: false,
        })
    }

    /// Compiles a matcher for a dictionary entry, carrying its hard-negative flag.
    pub fn from_entry(entry: &TokenEntry, short_token_length: usize) -> Result<Self, ClassifyError> {
        let mut matcher = Self::new(&entry.token, short_token_length)?;
        matcher.hard_negative = entry.is_hard_negative;
        Ok(matcher)
    }

    /// The lowercased token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns true if a match vetoes the classification.
    pub fn is_hard_negative(&self) -> bool {
        self.hard_negative
    }

    /// Returns true if the token uses whole-word matching.
    pub fn is_word_bounded(&self) -> bool {
        matches!(self.rule, MatchRule::WordBoundary(_))
    }

    /// Tests the token against text.
    pub fn is_match(&self, text: &str) -> bool {
        match &self.rule {
            MatchRule::Never => false,
            MatchRule::WordBoundary(regex) => regex.is_match(text),
            MatchRule::Substring => lowercase(text).contains(self.token.as_str()),
        }
    }
}

/// Lowercases text only when it contains uppercase characters.
fn lowercase(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_uppercase) {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// Tests a single dictionary entry against text without keeping the compiled matcher.
///
/// Returns false for empty tokens and for tokens that cannot be compiled.
pub fn is_match(text: &str, entry: &TokenEntry, short_token_length: usize) -> bool {
    TokenMatcher::from_entry(entry, short_token_length).is_ok_and(|m| m.is_match(text))
}
