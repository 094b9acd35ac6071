//! Individual dictionary tokens.

use serde::{Deserialize, Serialize};

use crate::normalize;

/// Where a token applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenScope {
    /// Shared across every client.
    Global,
    /// Specific to one client.
    #[default]
    Client,
}

/// Who contributed a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenSource {
    /// Generated during AI profile creation.
    Ai,
    /// Entered by the client or an operator.
    #[default]
    Client,
    /// Carried over from a legacy dictionary.
    Legacy,
}

impl TokenScope {
    /// Returns the stored (wire) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Client => "CLIENT",
        }
    }
}

impl TokenSource {
    /// Returns the stored (wire) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::Client => "CLIENT",
            Self::Legacy => "LEGACY",
        }
    }
}

/// A single normalized token in a dictionary bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    /// Normalized token text.
    pub token: String,
    /// Applicability of the token.
    #[serde(default)]
    pub scope: TokenScope,
    /// Origin of the token.
    #[serde(default)]
    pub source: TokenSource,
    /// Vetoes any positive classification when matched (negative bucket only).
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hard_negative: bool,
}

/// Serde helper to omit a `false` hard-negative flag.
fn is_false(value: &bool) -> bool {
    !*value
}

impl TokenEntry {
    /// Creates a client-scoped, client-sourced entry from raw text.
    pub fn new(token: &str) -> Self {
        Self {
            token: normalize(token),
            scope: TokenScope::Client,
            source: TokenSource::Client,
            is_hard_negative: false,
        }
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: TokenSource) -> Self {
        self.source = source;
        self
    }

    /// Sets the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: TokenScope) -> Self {
        self.scope = scope;
        self
    }

    /// Marks the entry as a hard negative.
    #[must_use]
    pub fn hard_negative(mut self) -> Self {
        self.is_hard_negative = true;
        self
    }

    /// Length of the token in characters.
    pub fn char_len(&self) -> usize {
        self.token.chars().count()
    }
}
