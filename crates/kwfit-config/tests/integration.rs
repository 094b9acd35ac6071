//! Integration tests for kwfit-config.
//!
//! Exercises the full loading pipeline: discovery -> parse -> merge -> validate.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use kwfit_config::{Config, ConfigError, ConfigWarning, TierStrategy};

/// Temporary directory tree for a single test.
struct TestEnv {
    /// Backing temporary directory.
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_no_config_returns_default() {
    let env = TestEnv::new();
    let config = Config::load_from_files(&[]).unwrap();

    assert!(config.clients.is_empty());
    assert!(config.config_root.is_none());
    assert_eq!(config.matching.short_token_length, 4);
    assert_eq!(
        config.data_dir(env.path()).unwrap(),
        env.path().join(".kwfit")
    );
}

#[test]
fn test_load_single_root_config() {
    let env = TestEnv::new();
    env.create_file(
        ".kwfit.toml",
        r#"
root = true

[settings]
data_dir = "store"
parallel = true

[client.acme]
location = "us"
domains = "*.acme.com"
"#,
    );
    let cwd = env.create_dir("reports");

    let config = Config::load(&cwd).unwrap();
    assert!(config.settings.parallel);
    assert_eq!(config.data_dir(&cwd).unwrap(), env.path().join("store"));

    let acme = config.client("acme").unwrap();
    assert_eq!(acme.location.as_deref(), Some("us"));
    assert_eq!(acme.domains, vec!["*.acme.com"]);
}

#[test]
fn test_nested_configs_merge_with_precedence() {
    let env = TestEnv::new();
    env.create_file(
        ".kwfit.toml",
        r#"
root = true

[scoring]
brand_weight = 8.0
core_threshold = 2.0

[priority]
tier_strategy = "fixed-threshold"

[client.globex]
"#,
    );
    env.create_file(
        "acme/.kwfit.toml",
        r#"
[scoring]
brand_weight = 12.0

[client.acme]
domains = ["acme.com"]
"#,
    );
    let cwd = env.create_dir("acme/runs");

    let config = Config::load(&cwd).unwrap();
    assert!((config.scoring.brand_weight - 12.0).abs() < f64::EPSILON);
    assert!((config.scoring.core_threshold - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.priority.tier_strategy, TierStrategy::FixedThreshold);

    let names: Vec<_> = config.clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["acme", "globex"]);

    // The data directory anchors at the most specific config file
    assert_eq!(
        config.data_dir(&cwd).unwrap(),
        env.path().join("acme").join(".kwfit")
    );
}

#[test]
fn test_invalid_toml_reports_path() {
    let env = TestEnv::new();
    let path = env.create_file(".kwfit.toml", "root = true\n[scoring\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_domain_pattern_fails_load() {
    let env = TestEnv::new();
    env.create_file(
        ".kwfit.toml",
        "root = true\n[client.acme]\ndomains = \"{acme\"\n",
    );

    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
}

#[test]
fn test_validate_reports_policy_warnings() {
    let env = TestEnv::new();
    env.create_file(
        ".kwfit.toml",
        r#"
root = true

[priority]
traffic_weight = 0.9
tier_percentages = [50, 50]
"#,
    );

    let config = Config::load(env.path()).unwrap();
    let warnings = config.validate();

    assert!(warnings.contains(&ConfigWarning::NoClientsDefined));
    assert!(
        warnings
            .iter()
            .any(|w| matches!(w, ConfigWarning::PriorityWeightsNotNormalized { .. }))
    );
    assert!(warnings.contains(&ConfigWarning::InvalidTierPercentages {
        percentages: vec![50, 50]
    }));
}

#[test]
fn test_settings_round_trip_through_toml() {
    let env = TestEnv::new();
    env.create_file(
        ".kwfit.toml",
        r#"
root = true

[matching]
short_token_length = 3

[client.acme]
domains = ["acme.com"]
"#,
    );

    let config = Config::load(env.path()).unwrap();
    let rendered = config.settings_to_toml();

    let reparsed_path = env.create_file("copy/.kwfit.toml", &format!("root = true\n{rendered}"));
    let reparsed = Config::load_from_files(&[reparsed_path]).unwrap();

    assert_eq!(reparsed.matching.short_token_length, 3);
    assert_eq!(reparsed.clients.len(), 1);
    assert_eq!(reparsed.clients[0].domains, vec!["acme.com"]);
}
