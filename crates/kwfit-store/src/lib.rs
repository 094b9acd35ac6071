//! JSON file storage for kwfit client data.
//!
//! Each client owns a directory under the data directory:
//!
//! ```text
//! <data_dir>/clients/<client>/
//!     dictionary.json   token dictionary
//!     keywords.json     keyword records
//!     tags.json         keyword tags keyed by normalized keyword
//!     pages.json        crawled page records
//! ```
//!
//! Missing files read as empty data (or no dictionary). Writes create directories as
//! needed and replace the whole file.

#![warn(missing_docs)]

mod error;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub use error::StoreError;
use kwfit_dictionary::{LoadedDictionary, MatchingDictionary, parse_dictionary};
use kwfit_priority::DomainPageRecord;
use kwfit_tagger::{DictionaryStore, KeywordRecord, KeywordSource, TagCollection, TagStore};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

/// Directory under the data directory that holds one directory per client.
const CLIENTS_DIR: &str = "clients";
/// Dictionary file name.
const DICTIONARY_FILE: &str = "dictionary.json";
/// Keyword records file name.
const KEYWORDS_FILE: &str = "keywords.json";
/// Tags file name.
const TAGS_FILE: &str = "tags.json";
/// Page records file name.
const PAGES_FILE: &str = "pages.json";

/// Client data stored as JSON files under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Data directory root.
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at a data directory. Nothing is created until a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding a client's files.
    pub fn client_dir(&self, client: &str) -> Result<PathBuf, StoreError> {
        let valid = !client.is_empty()
            && client != "."
            && client != ".."
            && client
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidClient {
                name: client.to_string(),
            });
        }
        Ok(self.root.join(CLIENTS_DIR).join(client))
    }

    /// Path to one of a client's files.
    fn client_file(&self, client: &str, file: &str) -> Result<PathBuf, StoreError> {
        Ok(self.client_dir(client)?.join(file))
    }

    /// Client codes that have a data directory, sorted.
    pub fn clients(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(CLIENTS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut clients = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                clients.push(name.to_string());
            }
        }
        clients.sort();
        Ok(clients)
    }

    /// Returns true if the client has a dictionary file.
    pub fn has_dictionary(&self, client: &str) -> Result<bool, StoreError> {
        Ok(self.client_file(client, DICTIONARY_FILE)?.exists())
    }

    /// Replaces a client's keyword records.
    pub fn save_keywords(&self, client: &str, records: &[KeywordRecord]) -> Result<(), StoreError> {
        write_json(&self.client_file(client, KEYWORDS_FILE)?, &records)
    }

    /// Loads a client's page records.
    pub fn load_pages(&self, client: &str) -> Result<Vec<DomainPageRecord>, StoreError> {
        Ok(read_json(&self.client_file(client, PAGES_FILE)?)?.unwrap_or_default())
    }

    /// Replaces a client's page records.
    pub fn save_pages(&self, client: &str, pages: &[DomainPageRecord]) -> Result<(), StoreError> {
        write_json(&self.client_file(client, PAGES_FILE)?, &pages)
    }
}

impl DictionaryStore for FileStore {
    type Error = StoreError;

    /// Loads a dictionary, writing it back in the current format when it was migrated.
    fn load_dictionary(&self, client: &str) -> Result<Option<LoadedDictionary>, StoreError> {
        let path = self.client_file(client, DICTIONARY_FILE)?;
        let Some(contents) = read_file(&path)? else {
            return Ok(None);
        };

        let loaded = parse_dictionary(&contents).map_err(|source| StoreError::Dictionary {
            path: path.clone(),
            source,
        })?;
        if loaded.migrated {
            info!(client, path = %path.display(), "writing back migrated dictionary");
            write_json(&path, &loaded.dictionary)?;
        }
        Ok(Some(loaded))
    }

    fn save_dictionary(
        &self,
        client: &str,
        dictionary: &MatchingDictionary,
    ) -> Result<(), StoreError> {
        write_json(&self.client_file(client, DICTIONARY_FILE)?, dictionary)
    }
}

impl KeywordSource for FileStore {
    type Error = StoreError;

    fn keyword_records(&self, client: &str) -> Result<Vec<KeywordRecord>, StoreError> {
        Ok(read_json(&self.client_file(client, KEYWORDS_FILE)?)?.unwrap_or_default())
    }
}

impl TagStore for FileStore {
    type Error = StoreError;

    fn load_tags(&self, client: &str) -> Result<TagCollection, StoreError> {
        Ok(read_json(&self.client_file(client, TAGS_FILE)?)?.unwrap_or_default())
    }

    fn save_tags(&self, client: &str, tags: &TagCollection) -> Result<(), StoreError> {
        write_json(&self.client_file(client, TAGS_FILE)?, tags)
    }
}

/// Reads a file, returning `None` if it does not exist.
fn read_file(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Reads and parses a JSON file, returning `None` if it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let Some(contents) = read_file(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes a value as pretty JSON, creating parent directories.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut contents = serde_json::to_string_pretty(value).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    contents.push('\n');

    fs::write(path, contents).map_err(|e| StoreError::io(path, e))?;
    debug!(path = %path.display(), "wrote data file");
    Ok(())
}
