//! Error types for classification.

use thiserror::Error;

/// Errors that can occur while compiling a dictionary or classifying a keyword.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A token could not be compiled into a word-boundary matcher.
    #[error("failed to compile matcher for token '{token}': {source}")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The keyword exceeds the configured length limit.
    #[error("keyword is {length} characters long, limit is {max}")]
    KeywordTooLong {
        /// Length of the keyword in characters.
        length: usize,
        /// Configured limit.
        max: usize,
    },
}
