//! Batch keyword tagging.
//!
//! The [`Tagger`] drives the classifier over a client's whole keyword set:
//!
//! 1. load the client's dictionary (failing with [`TagError::NotConfigured`] if there is none)
//! 2. load keyword records, apply the location and domain filters of a [`KeywordFilter`] and
//!    de-duplicate by normalized keyword
//! 3. classify every unique keyword, sequentially or on a rayon pool, checking a
//!    [`CancelFlag`] between records
//! 4. merge the results into the stored [`TagCollection`] in one sequential phase and
//!    persist it once
//!
//! Storage is reached through the [`DictionaryStore`], [`KeywordSource`] and [`TagStore`]
//! traits.

#![warn(missing_docs)]

mod cancel;
mod error;
mod filter;
mod record;
mod report;
mod store;
mod tag;
mod tagger;

pub use cancel::CancelFlag;
pub use error::TagError;
pub use filter::KeywordFilter;
pub use record::KeywordRecord;
pub use report::{RationaleSample, RecordFailure, TagRunReport};
pub use store::{DictionaryStore, KeywordSource, TagStore};
pub use tag::{KeywordTag, MergeStats, RunStamp, TagCollection};
pub use tagger::Tagger;
