//! Tagging run reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kwfit_classify::FitStatus;
use serde::Serialize;
use uuid::Uuid;

/// A keyword and the trace behind its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RationaleSample {
    /// Normalized keyword.
    pub keyword: String,
    /// Verdict.
    pub fit_status: FitStatus,
    /// Rule trace.
    pub rationale: String,
}

/// A keyword that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// Keyword as supplied.
    pub keyword: String,
    /// Why it failed.
    pub error: String,
}

/// Aggregate results of a tagging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRunReport {
    /// Id written on every tag this run touched.
    pub model_run_id: Uuid,
    /// When the run started.
    pub run_at: DateTime<Utc>,
    /// Records that passed the filters.
    pub total_keywords: usize,
    /// Distinct normalized keywords among them.
    pub unique_keywords: usize,
    /// Existing tags overwritten.
    pub updated: usize,
    /// New tags created.
    pub inserted: usize,
    /// Verdicts per fit status.
    pub status_counts: BTreeMap<FitStatus, usize>,
    /// The first few verdicts with their traces.
    pub sample_rationale: Vec<RationaleSample>,
    /// Keywords skipped because they failed to classify.
    pub failures: Vec<RecordFailure>,
}

impl TagRunReport {
    /// A report for a run with nothing to classify.
    pub fn empty(model_run_id: Uuid, run_at: DateTime<Utc>, total_keywords: usize) -> Self {
        Self {
            model_run_id,
            run_at,
            total_keywords,
            unique_keywords: 0,
            updated: 0,
            inserted: 0,
            status_counts: BTreeMap::new(),
            sample_rationale: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Keywords that were classified successfully.
    pub fn classified(&self) -> usize {
        self.status_counts.values().sum()
    }
}
