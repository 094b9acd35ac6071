//! Path resolution for the data directory.
//!
//! Resolves relative and tilde-prefixed data directory settings to absolute paths. Unlike
//! config files, the data directory does not need to exist yet: the store creates it on the
//! first write.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a data directory setting to an absolute path.
///
/// - Tilde paths (`~/kwfit`) expand to the home directory
/// - Relative paths (`.kwfit`, `../shared`) resolve against `base`
/// - Absolute paths are returned unchanged
pub fn resolve_data_dir(path: &str, base: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir()?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_data_dir(".kwfit", Path::new("/project")).unwrap();
        assert_eq!(resolved, PathBuf::from("/project/.kwfit"));
    }

    #[test]
    fn test_resolve_parent_relative_path() {
        let resolved = resolve_data_dir("../shared", Path::new("/project/app")).unwrap();
        assert_eq!(resolved, PathBuf::from("/project/app/../shared"));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let resolved = resolve_data_dir("/var/lib/kwfit", Path::new("/project")).unwrap();
        assert_eq!(resolved, PathBuf::from("/var/lib/kwfit"));
    }

    #[test]
    fn test_resolve_tilde_path() {
        let resolved = resolve_data_dir("~/kwfit-data", Path::new("/project")).unwrap();
        let home = BaseDirs::new().unwrap().home_dir().to_path_buf();
        assert_eq!(resolved, home.join("kwfit-data"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("data").unwrap(), PathBuf::from("data"));
        assert_eq!(expand_tilde("~user/x").unwrap(), PathBuf::from("~user/x"));
    }
}
