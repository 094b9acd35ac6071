//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use kwfit_config::{Client, Config};
use kwfit_store::FileStore;
use tracing::debug;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default when no config files were found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        debug!(
            cwd = %cwd.display(),
            clients = config.clients.len(),
            "configuration loaded"
        );
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `init`, which must work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Resolves the data directory.
    pub fn data_dir(&self) -> Result<PathBuf, ExitCode> {
        self.config.data_dir(&self.cwd).map_err(|e| {
            eprintln!("error: could not resolve data directory: {e}");
            ExitCode::FAILURE
        })
    }

    /// Opens the file store rooted at the data directory.
    pub fn store(&self) -> Result<FileStore, ExitCode> {
        Ok(FileStore::new(self.data_dir()?))
    }

    /// Looks up a configured client. Clients without a config entry are still usable;
    /// they just have no default filters.
    pub fn client(&self, name: &str) -> Option<&Client> {
        self.config.client(name)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
