//! Configuration system for kwfit.
//!
//! kwfit uses TOML configuration files named `.kwfit.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.kwfit.toml` files found, then loading `~/.kwfit.toml` as the global config with lowest
//! precedence.
//!
//! The configuration carries the complete scoring policy of the classifier (per-bucket
//! weights and decision thresholds), the priority scoring policy (component weights and
//! tier layout), and the per-client defaults used by the batch tagger.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod patterns;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawClient, RawConfig, RawMatchingSettings, RawPrioritySettings, RawScoringSettings,
    RawSettings, parse_config_file, parse_config_str,
};
pub use patterns::DomainPatterns;
pub use resolve::resolve_data_dir;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for kwfit.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.kwfit.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Token matching settings.
    pub matching: MatchingSettings,
    /// Keyword scoring policy.
    pub scoring: ScoringSettings,
    /// Page priority scoring policy.
    pub priority: PrioritySettings,
    /// Configured clients, sorted by name.
    pub clients: Vec<Client>,
    /// Directory containing the most specific config file (anchors the data directory).
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.kwfit.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Looks up a configured client by name.
    pub fn client(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.name == name)
    }

    /// Resolves the data directory holding dictionaries, keywords and tags.
    ///
    /// Relative paths are anchored at the most specific config file's directory, or at
    /// `cwd` when no config file was found.
    pub fn data_dir(&self, cwd: &Path) -> Result<PathBuf, ConfigError> {
        let base = self.config_root.as_deref().unwrap_or(cwd);
        resolve_data_dir(&self.settings.data_dir, base)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.kwfit.toml` file. Clients are emitted in name
    /// order so the output is deterministic.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            settings: self.settings.clone(),
            matching: self.matching.clone(),
            scoring: self.scoring.clone(),
            priority: self.priority.clone(),
            client: self
                .clients
                .iter()
                .map(|c| {
                    (
                        c.name.clone(),
                        SerializableClient {
                            location: c.location.clone(),
                            domains: c.domains.clone(),
                        },
                    )
                })
                .collect(),
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// General settings for kwfit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding per-client data files.
    pub data_dir: String,
    /// Score keywords on a rayon pool instead of sequentially.
    pub parallel: bool,
    /// Number of rationale samples included in a tagging report.
    pub sample_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: String::from(".kwfit"),
            parallel: false,
            sample_size: 5,
        }
    }
}

/// Token matching settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Tokens shorter than this many characters only match on word boundaries.
    pub short_token_length: usize,
    /// Keywords longer than this many characters are rejected per record.
    pub max_keyword_length: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            short_token_length: 4,
            max_keyword_length: 256,
        }
    }
}

/// Keyword scoring policy: per-bucket weights and decision thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Contribution of each matched brand token.
    pub brand_weight: f64,
    /// Contribution of each matched positive token.
    pub positive_weight: f64,
    /// Contribution of each matched ambiguous token when an anchor also matched.
    pub ambiguous_weight: f64,
    /// Contribution of each matched (soft) negative token.
    pub negative_weight: f64,
    /// Scores at or above this are brand keywords.
    pub brand_threshold: f64,
    /// Scores at or above this (with no negatives) are core matches.
    pub core_threshold: f64,
    /// Scores below this are rejected outright.
    pub negative_floor: f64,
    /// Scores above this (with no negatives) that miss the core threshold go to review.
    pub review_threshold: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            brand_weight: 10.0,
            positive_weight: 1.0,
            ambiguous_weight: 0.5,
            negative_weight: -5.0,
            brand_threshold: 10.0,
            core_threshold: 1.0,
            negative_floor: 0.0,
            review_threshold: 0.0,
        }
    }
}

/// How priority tiers are assigned to scored pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierStrategy {
    /// Rank-within-batch tiering with a fixed tier distribution.
    #[default]
    Percentile,
    /// Absolute score thresholds, independent of the rest of the batch.
    FixedThreshold,
}

impl TierStrategy {
    /// Returns the configuration name of this strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentile => "percentile",
            Self::FixedThreshold => "fixed-threshold",
        }
    }
}

impl fmt::Display for TierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "percentile" => Ok(Self::Percentile),
            "fixed-threshold" | "fixed" | "threshold" => Ok(Self::FixedThreshold),
            other => Err(format!(
                "unknown tier strategy '{other}' (expected 'percentile' or 'fixed-threshold')"
            )),
        }
    }
}

/// Page priority scoring policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrioritySettings {
    /// Weight of normalized estimated traffic value.
    pub traffic_weight: f64,
    /// Weight of the page intent score.
    pub intent_weight: f64,
    /// Weight of the page type score.
    pub page_type_weight: f64,
    /// Weight of the inferred business relevance score.
    pub relevance_weight: f64,
    /// Tier assignment strategy for batch scoring.
    pub tier_strategy: TierStrategy,
    /// Share of the batch, in percent, assigned to each of the five tiers (best first).
    pub tier_percentages: Vec<u32>,
    /// Minimum scores for tiers one through four under fixed-threshold tiering.
    pub tier_thresholds: Vec<f64>,
}

impl Default for PrioritySettings {
    fn default() -> Self {
        Self {
            traffic_weight: 0.40,
            intent_weight: 0.25,
            page_type_weight: 0.20,
            relevance_weight: 0.15,
            tier_strategy: TierStrategy::Percentile,
            tier_percentages: vec![10, 20, 30, 20, 20],
            tier_thresholds: vec![80.0, 60.0, 40.0, 20.0],
        }
    }
}

impl PrioritySettings {
    /// Sum of the four component weights.
    pub fn weight_sum(&self) -> f64 {
        self.traffic_weight + self.intent_weight + self.page_type_weight + self.relevance_weight
    }
}

/// A configured client with default keyword filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Client code used to address stored data.
    pub name: String,
    /// Default location filter for tagging runs.
    pub location: Option<String>,
    /// Default domain glob filters for tagging runs.
    pub domains: Vec<String>,
    /// Whether this client was defined in the global `~/.kwfit.toml`.
    pub is_global: bool,
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// General settings.
    settings: Settings,
    /// Token matching settings.
    matching: MatchingSettings,
    /// Keyword scoring policy.
    scoring: ScoringSettings,
    /// Page priority policy.
    priority: PrioritySettings,
    /// Clients keyed by name (sorted for deterministic output).
    client: BTreeMap<String, SerializableClient>,
}

/// Client definition as written back to TOML.
#[derive(Serialize)]
struct SerializableClient {
    /// Default location filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    /// Default domain filters.
    domains: Vec<String>,
}
