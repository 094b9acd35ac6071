//! Error types for tagging runs.

use std::error::Error as StdError;

use kwfit_classify::ClassifyError;
use thiserror::Error;

/// Errors that abort a tagging run. No tags are written when a run fails.
#[derive(Debug, Error)]
pub enum TagError {
    /// The client has no dictionary yet.
    #[error("client '{client}' has no dictionary; create one with `kwfit dict add` first")]
    NotConfigured {
        /// Client code.
        client: String,
    },

    /// The dictionary could not be compiled.
    #[error("failed to compile dictionary for client '{client}': {source}")]
    Dictionary {
        /// Client code.
        client: String,
        /// Underlying error.
        #[source]
        source: ClassifyError,
    },

    /// A storage backend failed.
    #[error("storage error: {0}")]
    Store(#[source] Box<dyn StdError + Send + Sync>),

    /// The run was cancelled before merging.
    #[error("tagging cancelled after {processed} keywords; nothing was written")]
    Cancelled {
        /// Keywords classified before the flag was observed.
        processed: usize,
    },
}

impl TagError {
    /// Wraps a storage backend error.
    pub fn store<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}
