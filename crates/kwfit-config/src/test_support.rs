//! Test helpers shared across kwfit-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A throwaway directory tree for laying out nested `.kwfit.toml` files.
pub struct ConfigTree {
    /// Removed on drop.
    temp: TempDir,
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().unwrap(),
        }
    }

    /// The tree's top directory.
    pub fn top(&self) -> &Path {
        self.temp.path()
    }

    /// Ensures `rel` exists as a directory; an empty string is the top.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.top().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes `.kwfit.toml` inside `rel` and returns its path.
    pub fn config(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Writes a config with no settings.
    pub fn plain(&self, rel: &str) -> PathBuf {
        self.config(rel, "# kwfit\n")
    }
}
