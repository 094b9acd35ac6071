//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use std::{collections::HashMap, path::PathBuf};

use crate::{
    Client, Config, ConfigError, MatchingSettings, PrioritySettings, ScoringSettings, Settings,
    discovery::is_global_config,
    parse::{
        RawClient, RawConfig, RawMatchingSettings, RawPrioritySettings, RawScoringSettings,
        RawSettings,
    },
    patterns::DomainPatterns,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to
/// CWD), lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - List settings (`tier_percentages`, `tier_thresholds`): replaced as a whole
/// - Clients: merged by name, first definition wins completely
///
/// Domain patterns of every surviving client are compiled here so that a bad glob fails
/// the load instead of the first tagging run.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let mut settings = Settings::default();
    let mut matching = MatchingSettings::default();
    let mut scoring = ScoringSettings::default();
    let mut priority = PrioritySettings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(ref s) = raw.settings {
            apply_raw_settings(&mut settings, s);
        }
        if let Some(ref m) = raw.matching {
            apply_raw_matching(&mut matching, m);
        }
        if let Some(ref s) = raw.scoring {
            apply_raw_scoring(&mut scoring, s);
        }
        if let Some(ref p) = raw.priority {
            apply_raw_priority(&mut priority, p);
        }
    }

    let clients = merge_clients(configs)?;
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Ok(Config {
        settings,
        matching,
        scoring,
        priority,
        clients,
        config_root,
    })
}

/// Applies raw general settings.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(ref v) = raw.data_dir {
        result.data_dir = v.clone();
    }
    if let Some(v) = raw.parallel {
        result.parallel = v;
    }
    if let Some(v) = raw.sample_size {
        result.sample_size = v;
    }
}

/// Applies raw matching settings.
fn apply_raw_matching(result: &mut MatchingSettings, raw: &RawMatchingSettings) {
    if let Some(v) = raw.short_token_length {
        result.short_token_length = v;
    }
    if let Some(v) = raw.max_keyword_length {
        result.max_keyword_length = v;
    }
}

/// Applies raw scoring policy values.
fn apply_raw_scoring(result: &mut ScoringSettings, raw: &RawScoringSettings) {
    let pairs = [
        (&mut result.brand_weight, raw.brand_weight),
        (&mut result.positive_weight, raw.positive_weight),
        (&mut result.ambiguous_weight, raw.ambiguous_weight),
        (&mut result.negative_weight, raw.negative_weight),
        (&mut result.brand_threshold, raw.brand_threshold),
        (&mut result.core_threshold, raw.core_threshold),
        (&mut result.negative_floor, raw.negative_floor),
        (&mut result.review_threshold, raw.review_threshold),
    ];
    for (slot, value) in pairs {
        if let Some(v) = value {
            *slot = v;
        }
    }
}

/// Applies raw priority policy values.
fn apply_raw_priority(result: &mut PrioritySettings, raw: &RawPrioritySettings) {
    if let Some(v) = raw.traffic_weight {
        result.traffic_weight = v;
    }
    if let Some(v) = raw.intent_weight {
        result.intent_weight = v;
    }
    if let Some(v) = raw.page_type_weight {
        result.page_type_weight = v;
    }
    if let Some(v) = raw.relevance_weight {
        result.relevance_weight = v;
    }
    if let Some(v) = raw.tier_strategy {
        result.tier_strategy = v;
    }
    if let Some(ref v) = raw.tier_percentages {
        result.tier_percentages = v.clone();
    }
    if let Some(ref v) = raw.tier_thresholds {
        result.tier_thresholds = v.clone();
    }
}

/// Merges clients from all configs; the highest-precedence definition of a name wins.
fn merge_clients(configs: &[ParsedConfig]) -> Result<Vec<Client>, ConfigError> {
    let mut seen: HashMap<String, Client> = HashMap::new();

    for parsed in configs {
        let Some(ref clients) = parsed.config.client else {
            continue;
        };
        let is_global = is_global_config(&parsed.path);

        for (name, raw) in clients {
            if seen.contains_key(name) {
                continue;
            }
            let client = convert_client(name, raw, is_global);
            DomainPatterns::compile(&client.domains)?;
            seen.insert(name.clone(), client);
        }
    }

    let mut clients: Vec<Client> = seen.into_values().collect();
    clients.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(clients)
}

/// Converts a raw client to the resolved type.
fn convert_client(name: &str, raw: &RawClient, is_global: bool) -> Client {
    Client {
        name: name.to_string(),
        location: raw.location.clone(),
        domains: raw.domains.clone().unwrap_or_default(),
        is_global,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{TierStrategy, parse::parse_config_str};

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new("test")).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty_configs() {
        let result = merge_configs(&[]).unwrap();
        assert_eq!(result.settings.sample_size, 5);
        assert!(result.clients.is_empty());
        assert!(result.config_root.is_none());
    }

    #[test]
    fn test_merge_single_config() {
        let config = parsed(
            "/project/.kwfit.toml",
            r#"
[settings]
sample_size = 10

[client.acme]
domains = "*.acme.com"
"#,
        );

        let result = merge_configs(&[config]).unwrap();
        assert_eq!(result.settings.sample_size, 10);
        assert_eq!(result.config_root, Some(PathBuf::from("/project")));
        assert_eq!(result.clients.len(), 1);
        assert_eq!(result.clients[0].name, "acme");
        assert_eq!(result.clients[0].domains, vec!["*.acme.com"]);
        assert!(!result.clients[0].is_global);
    }

    #[test]
    fn test_merge_scalar_override() {
        let high = parsed(
            "/project/app/.kwfit.toml",
            r#"
[scoring]
brand_weight = 20.0
"#,
        );
        let low = parsed(
            "/project/.kwfit.toml",
            r#"
[scoring]
brand_weight = 8.0
negative_weight = -3.0

[matching]
short_token_length = 3
"#,
        );

        let result = merge_configs(&[high, low]).unwrap();
        assert!((result.scoring.brand_weight - 20.0).abs() < f64::EPSILON);
        assert!((result.scoring.negative_weight + 3.0).abs() < f64::EPSILON);
        assert!((result.scoring.positive_weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.matching.short_token_length, 3);
        assert_eq!(result.config_root, Some(PathBuf::from("/project/app")));
    }

    #[test]
    fn test_merge_priority_lists_replace_whole() {
        let high = parsed(
            "/a/.kwfit.toml",
            "[priority]\ntier_percentages = [20, 20, 20, 20, 20]\n",
        );
        let low = parsed(
            "/.kwfit.toml",
            "[priority]\ntier_strategy = \"fixed-threshold\"\ntier_percentages = [5, 5, 30, 30, 30]\n",
        );

        let result = merge_configs(&[high, low]).unwrap();
        assert_eq!(result.priority.tier_percentages, vec![20, 20, 20, 20, 20]);
        assert_eq!(result.priority.tier_strategy, TierStrategy::FixedThreshold);
    }

    #[test]
    fn test_merge_clients_first_wins() {
        let high = parsed(
            "/a/.kwfit.toml",
            "[client.acme]\nlocation = \"de\"\n",
        );
        let low = parsed(
            "/.kwfit.toml",
            "[client.acme]\nlocation = \"us\"\ndomains = [\"acme.com\"]\n\n[client.globex]\n",
        );

        let result = merge_configs(&[high, low]).unwrap();
        let names: Vec<_> = result.clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["acme", "globex"]);

        let acme = &result.clients[0];
        assert_eq!(acme.location.as_deref(), Some("de"));
        assert!(acme.domains.is_empty(), "first definition wins completely");
    }

    #[test]
    fn test_merge_rejects_invalid_domain_glob() {
        let config = parsed("/a/.kwfit.toml", "[client.acme]\ndomains = \"acme[.com\"\n");
        let result = merge_configs(&[config]);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
