//! Keyword records from the keyword source.

use std::borrow::Cow;

use kwfit_dictionary::normalize;
use serde::{Deserialize, Serialize};

/// One keyword as tracked for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    /// Keyword as entered or fetched.
    pub keyword: String,
    /// Normalized form, if the source already computed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    /// Location the keyword is tracked in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Domain the keyword was found for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl KeywordRecord {
    /// Creates a record with only the keyword set.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// The normalized keyword, computed when the source did not supply one.
    pub fn normalized_keyword(&self) -> Cow<'_, str> {
        match &self.normalized {
            Some(n) => Cow::Borrowed(n.as_str()),
            None => Cow::Owned(normalize(&self.keyword)),
        }
    }
}
