//! Shared helpers for command implementations.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use kwfit_classify::Classifier;
use kwfit_dictionary::{MatchingDictionary, ProductLine};
use kwfit_store::FileStore;
use kwfit_tagger::{DictionaryStore, Tagger};

use crate::cli::context::CommandContext;

/// Loads a client's dictionary, failing when the client has none.
pub fn require_dictionary(store: &FileStore, client: &str) -> Result<MatchingDictionary, ExitCode> {
    match load_dictionary(store, client)? {
        Some(dictionary) => Ok(dictionary),
        None => {
            eprintln!("error: client '{client}' has no dictionary");
            eprintln!("Run 'kwfit dict add {client} <bucket> <tokens>...' to create one.");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Loads a client's dictionary if it has one.
pub fn load_dictionary(
    store: &FileStore,
    client: &str,
) -> Result<Option<MatchingDictionary>, ExitCode> {
    match store.load_dictionary(client) {
        Ok(loaded) => Ok(loaded.map(|l| l.dictionary)),
        Err(e) => {
            eprintln!("error: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Saves a client's dictionary.
pub fn save_dictionary(
    store: &FileStore,
    client: &str,
    dictionary: &MatchingDictionary,
) -> Result<(), ExitCode> {
    store.save_dictionary(client, dictionary).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}

/// Compiles a client's dictionary under the configured policy.
pub fn classifier(
    ctx: &CommandContext,
    store: &FileStore,
    client: &str,
) -> Result<Classifier, ExitCode> {
    Tagger::new(store, &ctx.config)
        .classifier(client)
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
}

/// Joins product lines for display.
pub fn format_lines(lines: &[ProductLine]) -> String {
    lines
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `.gitignore` beside a data directory and the line that ignores it.
pub struct GitignoreEntry {
    /// Path of the `.gitignore` file.
    pub path: PathBuf,
    /// Directory pattern, such as `.kwfit/`.
    pub pattern: String,
}

impl GitignoreEntry {
    /// Finds the `.gitignore` next to `data_dir`. Returns `None` when there is none.
    pub fn beside(data_dir: &Path) -> Option<Self> {
        let name = data_dir.file_name()?.to_str()?;
        let path = data_dir.parent()?.join(".gitignore");
        path.is_file().then(|| Self {
            path,
            pattern: format!("{name}/"),
        })
    }

    /// Returns true if the file already ignores the directory.
    pub fn is_listed(&self) -> io::Result<bool> {
        Ok(self.lists(&fs::read_to_string(&self.path)?))
    }

    /// Appends the pattern unless it is already listed. Returns true if the file changed.
    pub fn ensure_listed(&self) -> io::Result<bool> {
        let contents = fs::read_to_string(&self.path)?;
        if self.lists(&contents) {
            return Ok(false);
        }

        let mut file = fs::OpenOptions::new().append(true).open(&self.path)?;
        if !contents.is_empty() && !contents.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{}", self.pattern)?;
        Ok(true)
    }

    /// Checks file contents for the pattern, with or without the trailing slash.
    fn lists(&self, contents: &str) -> bool {
        let bare = self.pattern.trim_end_matches('/');
        contents
            .lines()
            .map(str::trim)
            .any(|line| line == self.pattern || line == bare)
    }
}
