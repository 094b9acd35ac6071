//! Error types for dictionary editing and loading.

use thiserror::Error;

use crate::{ProductLine, TokenBucket};

/// Errors that can occur when editing or parsing a dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// A token normalized to the empty string.
    #[error("token '{raw}' is empty after normalization")]
    EmptyToken {
        /// The token as supplied.
        raw: String,
    },

    /// The hard-negative flag was set on a token outside the negative bucket.
    #[error("only negative tokens can be hard negatives (got bucket '{bucket}')")]
    HardNegativeOutsideNegatives {
        /// Bucket the token was added to.
        bucket: TokenBucket,
    },

    /// A sentinel product line was used where a concrete line is required.
    #[error("'{line}' is not a concrete product line")]
    NonConcreteProductLine {
        /// The rejected product line.
        line: ProductLine,
    },

    /// The dictionary declares a version newer than this build understands.
    #[error("unsupported dictionary version {version}")]
    UnsupportedVersion {
        /// Declared version.
        version: u64,
    },

    /// The dictionary JSON could not be parsed.
    #[error("failed to parse dictionary: {0}")]
    Parse(#[from] serde_json::Error),
}
