//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for settings that load fine but
//! would make the scoring policy behave unexpectedly.

use std::fmt;

use crate::Config;

/// Number of priority tiers.
const TIER_COUNT: usize = 5;

/// Tolerance for comparing floating point weight sums.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// No clients are defined.
    NoClientsDefined,
    /// Priority component weights do not sum to 1.
    PriorityWeightsNotNormalized {
        /// Actual sum of the four weights.
        sum: f64,
    },
    /// Tier percentages are not five entries summing to 100.
    InvalidTierPercentages {
        /// The configured percentages.
        percentages: Vec<u32>,
    },
    /// Fixed tier thresholds are not four strictly descending values.
    InvalidTierThresholds {
        /// The configured thresholds.
        thresholds: Vec<f64>,
    },
    /// The brand threshold does not sit above the core threshold.
    BrandThresholdNotAboveCore {
        /// Configured brand threshold.
        brand: f64,
        /// Configured core threshold.
        core: f64,
    },
    /// A bucket weight has the wrong sign and will invert its meaning.
    WeightSign {
        /// Name of the offending setting.
        setting: &'static str,
        /// Configured value.
        value: f64,
    },
    /// Word-boundary matching is disabled entirely.
    ShortTokenMatchingDisabled,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoClientsDefined => write!(f, "no clients are defined in configuration"),
            Self::PriorityWeightsNotNormalized { sum } => {
                write!(f, "priority weights sum to {sum:.3}, expected 1.0")
            }
            Self::InvalidTierPercentages { percentages } => write!(
                f,
                "tier_percentages {percentages:?} must be {TIER_COUNT} values summing to 100"
            ),
            Self::InvalidTierThresholds { thresholds } => write!(
                f,
                "tier_thresholds {thresholds:?} must be {} strictly descending values",
                TIER_COUNT - 1
            ),
            Self::BrandThresholdNotAboveCore { brand, core } => write!(
                f,
                "brand_threshold ({brand}) should be greater than core_threshold ({core})"
            ),
            Self::WeightSign { setting, value } => {
                write!(f, "{setting} has an unexpected sign: {value}")
            }
            Self::ShortTokenMatchingDisabled => write!(
                f,
                "short_token_length is 0, so short tokens will match inside longer words"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.clients.is_empty() {
        warnings.push(ConfigWarning::NoClientsDefined);
    }

    let scoring = &config.scoring;
    if scoring.brand_threshold <= scoring.core_threshold {
        warnings.push(ConfigWarning::BrandThresholdNotAboveCore {
            brand: scoring.brand_threshold,
            core: scoring.core_threshold,
        });
    }
    for (setting, value, positive) in [
        ("brand_weight", scoring.brand_weight, true),
        ("positive_weight", scoring.positive_weight, true),
        ("ambiguous_weight", scoring.ambiguous_weight, true),
        ("negative_weight", scoring.negative_weight, false),
    ] {
        let ok = if positive { value > 0.0 } else { value < 0.0 };
        if !ok {
            warnings.push(ConfigWarning::WeightSign { setting, value });
        }
    }

    if config.matching.short_token_length == 0 {
        warnings.push(ConfigWarning::ShortTokenMatchingDisabled);
    }

    let priority = &config.priority;
    let sum = priority.weight_sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warnings.push(ConfigWarning::PriorityWeightsNotNormalized { sum });
    }

    let percentages = &priority.tier_percentages;
    if percentages.len() != TIER_COUNT || percentages.iter().sum::<u32>() != 100 {
        warnings.push(ConfigWarning::InvalidTierPercentages {
            percentages: percentages.clone(),
        });
    }

    let thresholds = &priority.tier_thresholds;
    let descending = thresholds.windows(2).all(|w| w[0] > w[1]);
    if thresholds.len() != TIER_COUNT - 1 || !descending {
        warnings.push(ConfigWarning::InvalidTierThresholds {
            thresholds: thresholds.clone(),
        });
    }

    warnings
}
