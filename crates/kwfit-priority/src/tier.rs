//! Priority tiers and the two tiering strategies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of tiers.
pub(crate) const TIER_COUNT: usize = 5;

/// Where a page sits in the work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Work on now.
    #[serde(rename = "TIER_1_IMMEDIATE")]
    Immediate,
    /// Work on soon.
    #[serde(rename = "TIER_2_HIGH")]
    High,
    /// Work on when capacity allows.
    #[serde(rename = "TIER_3_MEDIUM")]
    Medium,
    /// Watch only.
    #[serde(rename = "TIER_4_MONITOR")]
    Monitor,
    /// Leave alone.
    #[serde(rename = "TIER_5_IGNORE")]
    Ignore,
}

impl PriorityTier {
    /// Every tier, best first.
    pub const ALL: [Self; TIER_COUNT] = [
        Self::Immediate,
        Self::High,
        Self::Medium,
        Self::Monitor,
        Self::Ignore,
    ];

    /// Returns the stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "TIER_1_IMMEDIATE",
            Self::High => "TIER_2_HIGH",
            Self::Medium => "TIER_3_MEDIUM",
            Self::Monitor => "TIER_4_MONITOR",
            Self::Ignore => "TIER_5_IGNORE",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns tiers to `count` pages already sorted best first.
///
/// Rank `i` goes to the first tier whose cumulative percentage `c` satisfies
/// `i * 100 < c * count`. The arithmetic is exact, so each tier holds within one page of
/// its share and every page gets exactly one tier. `percentages` must hold five values
/// summing to 100.
pub fn percentile_tiers(count: usize, percentages: &[u32]) -> Vec<PriorityTier> {
    let n = count as u64;
    let mut cumulative = Vec::with_capacity(TIER_COUNT);
    let mut running = 0_u64;
    for p in percentages.iter().take(TIER_COUNT) {
        running += u64::from(*p);
        cumulative.push(running);
    }

    (0..n)
        .map(|i| {
            cumulative
                .iter()
                .position(|c| i * 100 < c * n)
                .map_or(PriorityTier::Ignore, |k| PriorityTier::ALL[k])
        })
        .collect()
}

/// Assigns a tier from absolute score thresholds, best first.
///
/// A score at or above `thresholds[k]` lands in tier `k + 1`; anything below the last
/// threshold is ignored.
pub fn threshold_tier(score: f64, thresholds: &[f64]) -> PriorityTier {
    thresholds
        .iter()
        .take(TIER_COUNT - 1)
        .position(|t| score >= *t)
        .map_or(PriorityTier::Ignore, |k| PriorityTier::ALL[k])
}
