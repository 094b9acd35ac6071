//! Error types for the file store.

use std::{io, path::PathBuf};

use kwfit_dictionary::DictionaryError;
use thiserror::Error;

/// Errors that can occur when reading or writing client data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A client code cannot be used as a directory name.
    #[error("invalid client code '{name}'")]
    InvalidClient {
        /// The rejected code.
        name: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A data file is not valid JSON for its record type.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The data file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A dictionary file could not be loaded.
    #[error("failed to load dictionary {path}: {source}")]
    Dictionary {
        /// The dictionary file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: DictionaryError,
    },
}

impl StoreError {
    /// Creates an `Io` error for a path.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
