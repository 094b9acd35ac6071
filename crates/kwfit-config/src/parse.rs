//! Configuration file parsing.
//!
//! Parses individual `.kwfit.toml` files into intermediate `RawConfig` structures that
//! preserve the optional nature of all fields before merging.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::{ConfigError, TierStrategy};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Matching settings section.
    pub matching: Option<RawMatchingSettings>,
    /// Scoring policy section.
    pub scoring: Option<RawScoringSettings>,
    /// Priority policy section.
    pub priority: Option<RawPrioritySettings>,
    /// Client definitions: name -> client config.
    pub client: Option<HashMap<String, RawClient>>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Parallel scoring toggle.
    pub parallel: Option<bool>,
    /// Rationale samples per report.
    pub sample_size: Option<usize>,
}

/// Raw matching settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMatchingSettings {
    /// Word-boundary matching cutoff.
    pub short_token_length: Option<usize>,
    /// Per-record keyword length limit.
    pub max_keyword_length: Option<usize>,
}

/// Raw scoring policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScoringSettings {
    /// Brand token weight.
    pub brand_weight: Option<f64>,
    /// Positive token weight.
    pub positive_weight: Option<f64>,
    /// Anchored ambiguous token weight.
    pub ambiguous_weight: Option<f64>,
    /// Soft negative token weight.
    pub negative_weight: Option<f64>,
    /// Brand keyword threshold.
    pub brand_threshold: Option<f64>,
    /// Core match threshold.
    pub core_threshold: Option<f64>,
    /// Rejection floor.
    pub negative_floor: Option<f64>,
    /// Review cutoff below the core threshold.
    pub review_threshold: Option<f64>,
}

/// Raw priority policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPrioritySettings {
    /// Traffic component weight.
    pub traffic_weight: Option<f64>,
    /// Intent component weight.
    pub intent_weight: Option<f64>,
    /// Page type component weight.
    pub page_type_weight: Option<f64>,
    /// Business relevance component weight.
    pub relevance_weight: Option<f64>,
    /// Tiering strategy.
    pub tier_strategy: Option<TierStrategy>,
    /// Tier distribution in percent.
    pub tier_percentages: Option<Vec<u32>>,
    /// Fixed tier thresholds.
    pub tier_thresholds: Option<Vec<f64>>,
}

/// Raw client definition from TOML.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawClient {
    /// Default location filter.
    pub location: Option<String>,
    /// Default domain glob filter(s). Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub domains: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RawConfig {
        parse_config_str(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("");
        assert!(config.root.is_none());
        assert!(config.settings.is_none());
        assert!(config.scoring.is_none());
        assert!(config.priority.is_none());
        assert!(config.client.is_none());
    }

    #[test]
    fn test_parse_scoring_section() {
        let config = parse(
            r#"
[scoring]
brand_weight = 12.0
negative_weight = -4.0
core_threshold = 2.0
"#,
        );
        let scoring = config.scoring.unwrap();
        assert_eq!(scoring.brand_weight, Some(12.0));
        assert_eq!(scoring.negative_weight, Some(-4.0));
        assert_eq!(scoring.core_threshold, Some(2.0));
        assert!(scoring.positive_weight.is_none());
    }

    #[test]
    fn test_parse_priority_section() {
        let config = parse(
            r#"
[priority]
traffic_weight = 0.5
tier_strategy = "fixed-threshold"
tier_percentages = [20, 20, 20, 20, 20]
tier_thresholds = [90.0, 70.0, 50.0, 30.0]
"#,
        );
        let priority = config.priority.unwrap();
        assert_eq!(priority.traffic_weight, Some(0.5));
        assert_eq!(priority.tier_strategy, Some(TierStrategy::FixedThreshold));
        assert_eq!(priority.tier_percentages, Some(vec![20, 20, 20, 20, 20]));
        assert_eq!(priority.tier_thresholds.unwrap().len(), 4);
    }

    #[test]
    fn test_parse_unknown_tier_strategy_fails() {
        let result = parse_config_str(
            "[priority]\ntier_strategy = \"sideways\"\n",
            Path::new("test.toml"),
        );
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_client_single_domain() {
        let config = parse(
            r#"
[client.acme]
location = "us"
domains = "*.acme.com"
"#,
        );
        let clients = config.client.unwrap();
        let acme = clients.get("acme").unwrap();
        assert_eq!(acme.location.as_deref(), Some("us"));
        assert_eq!(acme.domains, Some(vec!["*.acme.com".to_string()]));
    }

    #[test]
    fn test_parse_client_many_domains() {
        let config = parse(
            r#"
[client.globex]
domains = ["globex.com", "*.globex.io"]
"#,
        );
        let clients = config.client.unwrap();
        let globex = clients.get("globex").unwrap();
        assert!(globex.location.is_none());
        assert_eq!(
            globex.domains,
            Some(vec!["globex.com".to_string(), "*.globex.io".to_string()])
        );
    }

    #[test]
    fn test_parse_client_without_fields() {
        let config = parse("[client.initech]\n");
        let clients = config.client.unwrap();
        let initech = clients.get("initech").unwrap();
        assert!(initech.location.is_none());
        assert!(initech.domains.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config_str("this is not valid toml [[[", Path::new("test.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_wrong_type_error() {
        let result = parse_config_str(
            "[scoring]\nbrand_weight = \"lots\"\n",
            Path::new("test.toml"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_unknown_fields_ignored() {
        let config = parse(
            r#"
[settings]
sample_size = 3
unknown_field = "ignored"

[unknown_section]
foo = "bar"
"#,
        );
        assert_eq!(config.settings.unwrap().sample_size, Some(3));
    }

    #[test]
    fn test_parse_config_file_not_found() {
        let result = parse_config_file(Path::new("/nonexistent/path/.kwfit.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".kwfit.toml");

        fs::write(&config_path, "root = true\n").unwrap();
        assert!(is_root_config(&config_path));

        fs::write(&config_path, "root = false\n").unwrap();
        assert!(!is_root_config(&config_path));

        fs::write(&config_path, "[settings]\nsample_size = 2\n").unwrap();
        assert!(!is_root_config(&config_path));

        assert!(!is_root_config(Path::new("/nonexistent/.kwfit.toml")));
    }
}
