//! Composite scoring and batch tiering.

use std::collections::{BTreeMap, HashSet};

use kwfit_config::{PrioritySettings, TierStrategy};
use serde::Serialize;
use tracing::debug;

use crate::{
    BusinessRelevance, DomainPageRecord, PriorityError, PriorityTier, infer_relevance,
    percentile_tiers, threshold_tier,
    tier::TIER_COUNT,
};

/// Normalizes an estimated traffic value against the batch maximum, on a 0-100 scale.
///
/// Zero for non-positive or non-finite inputs.
pub fn normalize_etv(etv: f64, max_etv: f64) -> f64 {
    if !etv.is_finite() || !max_etv.is_finite() || etv <= 0.0 || max_etv <= 0.0 {
        return 0.0;
    }
    (etv / max_etv * 100.0).min(100.0)
}

/// Rounds to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Component scores behind a composite score, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Normalized traffic value.
    pub traffic: f64,
    /// Intent table score.
    pub intent: f64,
    /// Page type table score.
    pub page_type: f64,
    /// Inferred relevance level.
    pub business_relevance: BusinessRelevance,
    /// Relevance level score.
    pub relevance: f64,
}

/// The scored result for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePriority {
    /// Composite score rounded to two decimals.
    pub score: f64,
    /// Assigned tier.
    pub tier: PriorityTier,
    /// Position in the batch ranking, starting at 1.
    pub rank: usize,
    /// Component scores.
    pub breakdown: ScoreBreakdown,
}

/// Results for a whole batch, keyed by page id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBatch {
    /// Strategy that assigned the tiers.
    pub strategy: TierStrategy,
    /// Per-page results.
    pub pages: BTreeMap<String, PagePriority>,
}

impl PriorityBatch {
    /// Number of pages per tier, best first.
    pub fn tier_counts(&self) -> [(PriorityTier, usize); TIER_COUNT] {
        PriorityTier::ALL.map(|tier| {
            let count = self.pages.values().filter(|p| p.tier == tier).count();
            (tier, count)
        })
    }

    /// Results ordered by rank.
    pub fn ranked(&self) -> Vec<(&str, &PagePriority)> {
        let mut ranked: Vec<_> = self.pages.iter().map(|(id, p)| (id.as_str(), p)).collect();
        ranked.sort_by_key(|(_, p)| p.rank);
        ranked
    }

    /// Writes score and tier onto the matching records. Returns how many were updated.
    pub fn apply(&self, records: &mut [DomainPageRecord]) -> usize {
        let mut updated = 0;
        for record in records {
            if let Some(result) = self.pages.get(&record.id) {
                record.priority_score = Some(result.score);
                record.priority_tier = Some(result.tier);
                updated += 1;
            }
        }
        updated
    }
}

/// Scores pages under a priority policy.
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    /// Weights and tiering policy.
    settings: PrioritySettings,
}

impl PriorityScorer {
    /// Creates a scorer for a policy.
    pub fn new(settings: PrioritySettings) -> Self {
        Self { settings }
    }

    /// Computes the composite score of one page against a batch maximum.
    pub fn score_page(&self, page: &DomainPageRecord, max_etv: f64) -> (f64, ScoreBreakdown) {
        let relevance_level = infer_relevance(page.page_intent, page.page_type, page.is_seo_relevant);
        let breakdown = ScoreBreakdown {
            traffic: normalize_etv(page.etv(), max_etv),
            intent: page.page_intent.score(),
            page_type: page.page_type.score(),
            business_relevance: relevance_level,
            relevance: relevance_level.score(),
        };

        let s = &self.settings;
        let score = s.traffic_weight * breakdown.traffic
            + s.intent_weight * breakdown.intent
            + s.page_type_weight * breakdown.page_type
            + s.relevance_weight * breakdown.relevance;

        (round2(score), breakdown)
    }

    /// Scores a single page with fixed thresholds.
    ///
    /// With no batch to rank against, the tier comes from absolute thresholds, so results
    /// differ from what the same page would get inside a percentile batch.
    pub fn score_single(
        &self,
        page: &DomainPageRecord,
        max_etv: f64,
    ) -> Result<PagePriority, PriorityError> {
        self.check_thresholds()?;
        let (score, breakdown) = self.score_page(page, max_etv);
        Ok(PagePriority {
            score,
            tier: threshold_tier(score, &self.settings.tier_thresholds),
            rank: 1,
            breakdown,
        })
    }

    /// Scores a batch with the configured strategy.
    pub fn score_batch(&self, pages: &[DomainPageRecord]) -> Result<PriorityBatch, PriorityError> {
        self.score_batch_with(pages, self.settings.tier_strategy)
    }

    /// Scores a batch with an explicit strategy.
    ///
    /// Pages are ranked by score, best first, with ties broken by page id. Duplicate ids
    /// are rejected.
    pub fn score_batch_with(
        &self,
        pages: &[DomainPageRecord],
        strategy: TierStrategy,
    ) -> Result<PriorityBatch, PriorityError> {
        match strategy {
            TierStrategy::Percentile => self.check_percentages()?,
            TierStrategy::FixedThreshold => self.check_thresholds()?,
        }

        let mut seen = HashSet::with_capacity(pages.len());
        for page in pages {
            if !seen.insert(page.id.as_str()) {
                return Err(PriorityError::DuplicatePageId {
                    id: page.id.clone(),
                });
            }
        }

        let max_etv = pages
            .iter()
            .map(DomainPageRecord::etv)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        let mut scored: Vec<(&str, f64, ScoreBreakdown)> = pages
            .iter()
            .map(|page| {
                let (score, breakdown) = self.score_page(page, max_etv);
                (page.id.as_str(), score, breakdown)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let tiers = match strategy {
            TierStrategy::Percentile => {
                percentile_tiers(scored.len(), &self.settings.tier_percentages)
            }
            TierStrategy::FixedThreshold => scored
                .iter()
                .map(|(_, score, _)| threshold_tier(*score, &self.settings.tier_thresholds))
                .collect(),
        };

        let pages: BTreeMap<String, PagePriority> = scored
            .into_iter()
            .zip(tiers)
            .enumerate()
            .map(|(i, ((id, score, breakdown), tier))| {
                let result = PagePriority {
                    score,
                    tier,
                    rank: i + 1,
                    breakdown,
                };
                (id.to_string(), result)
            })
            .collect();

        let batch = PriorityBatch { strategy, pages };
        debug!(
            pages = batch.pages.len(),
            %strategy,
            max_etv,
            tiers = ?batch.tier_counts(),
            "scored page batch"
        );
        Ok(batch)
    }

    /// Checks the percentile split.
    fn check_percentages(&self) -> Result<(), PriorityError> {
        let percentages = &self.settings.tier_percentages;
        if percentages.len() != TIER_COUNT || percentages.iter().sum::<u32>() != 100 {
            return Err(PriorityError::InvalidTierPercentages {
                percentages: percentages.clone(),
            });
        }
        Ok(())
    }

    /// Checks the fixed thresholds.
    fn check_thresholds(&self) -> Result<(), PriorityError> {
        let thresholds = &self.settings.tier_thresholds;
        if thresholds.len() != TIER_COUNT - 1 || !thresholds.windows(2).all(|w| w[0] > w[1]) {
            return Err(PriorityError::InvalidTierThresholds {
                thresholds: thresholds.clone(),
            });
        }
        Ok(())
    }
}
