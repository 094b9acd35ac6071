//! Error types for priority scoring.

use thiserror::Error;

/// Errors that can occur when scoring a batch of pages.
#[derive(Debug, Error)]
pub enum PriorityError {
    /// Two pages in the batch share an id.
    #[error("duplicate page id '{id}' in batch")]
    DuplicatePageId {
        /// The repeated id.
        id: String,
    },

    /// Tier percentages are not five values summing to 100.
    #[error("tier percentages {percentages:?} must be 5 values summing to 100")]
    InvalidTierPercentages {
        /// The configured percentages.
        percentages: Vec<u32>,
    },

    /// Fixed thresholds are not four strictly descending values.
    #[error("tier thresholds {thresholds:?} must be 4 strictly descending values")]
    InvalidTierThresholds {
        /// The configured thresholds.
        thresholds: Vec<f64>,
    },
}
