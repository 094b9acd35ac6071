//! Storage seams the tagger depends on.

use std::error::Error as StdError;

use kwfit_dictionary::{LoadedDictionary, MatchingDictionary};

use crate::{KeywordRecord, TagCollection};

/// Per-client dictionary storage.
pub trait DictionaryStore {
    /// Backend error type.
    type Error: StdError + Send + Sync + 'static;

    /// Loads a client's dictionary, migrating the legacy shape when needed.
    ///
    /// Returns `None` when the client has no dictionary.
    fn load_dictionary(&self, client: &str) -> Result<Option<LoadedDictionary>, Self::Error>;

    /// Replaces a client's dictionary.
    fn save_dictionary(
        &self,
        client: &str,
        dictionary: &MatchingDictionary,
    ) -> Result<(), Self::Error>;
}

/// Source of a client's keyword records.
pub trait KeywordSource {
    /// Backend error type.
    type Error: StdError + Send + Sync + 'static;

    /// Every keyword record of the client. A client without keywords yields an empty list.
    fn keyword_records(&self, client: &str) -> Result<Vec<KeywordRecord>, Self::Error>;
}

/// Per-client tag storage.
pub trait TagStore {
    /// Backend error type.
    type Error: StdError + Send + Sync + 'static;

    /// Loads a client's tags. A client without tags yields an empty collection.
    fn load_tags(&self, client: &str) -> Result<TagCollection, Self::Error>;

    /// Replaces a client's tags.
    fn save_tags(&self, client: &str, tags: &TagCollection) -> Result<(), Self::Error>;
}
