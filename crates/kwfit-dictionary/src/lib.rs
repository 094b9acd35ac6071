//! Client token dictionaries for the kwfit keyword classifier.
//!
//! A [`MatchingDictionary`] holds the categorized vocabulary used to judge whether a
//! keyword is relevant to a client's offering: brand, positive, negative (optionally hard
//! negative), ambiguous, anchor and ignore tokens, plus a map from positive tokens to the
//! product lines they imply.
//!
//! Dictionaries are edited token by token, persisted as JSON, and migrated from the older
//! flat [`LegacyDictionary`] shape the first time they are loaded.

#![warn(missing_docs)]

mod dictionary;
mod entry;
mod error;
mod legacy;
mod normalize;
mod product_line;
mod validate;

pub use dictionary::{BulkAddSummary, CURRENT_VERSION, MatchingDictionary, TokenBucket};
pub use entry::{TokenEntry, TokenScope, TokenSource};
pub use error::DictionaryError;
pub use legacy::{LegacyDictionary, LoadedDictionary, parse_dictionary};
pub use normalize::normalize;
pub use product_line::ProductLine;
pub use validate::DictionaryWarning;
