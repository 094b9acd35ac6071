//! Stored keyword tags and the run merge.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kwfit_classify::{Classification, FitStatus};
use kwfit_dictionary::ProductLine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Identity and time of one tagging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp {
    /// Id recorded on every tag the run writes.
    pub model_run_id: Uuid,
    /// When the run started.
    pub at: DateTime<Utc>,
}

impl RunStamp {
    /// A fresh run id at the current time.
    pub fn now() -> Self {
        Self {
            model_run_id: Uuid::new_v4(),
            at: Utc::now(),
        }
    }
}

/// The stored verdict for one normalized keyword.
///
/// The tag file is shared with other tools. An entry may hold only their fields (such as a
/// second classifier's `tag2Status`) until a run classifies the keyword, so every field
/// kwfit owns is optional. Foreign fields are kept in `extra` and survive merges untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordTag {
    /// Fit verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_status: Option<FitStatus>,
    /// Assigned product line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_line: Option<ProductLine>,
    /// Trace of the rules that fired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Signed score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Run that last wrote the tag fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_run_id: Option<String>,
    /// When kwfit first wrote the tag fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the tag fields were last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Fields owned by other tools.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeywordTag {
    /// Overwrites the kwfit fields with a run's result.
    ///
    /// `createdAt` is only set when absent.
    fn apply(&mut self, result: &Classification, run_id: &str, stamp: &RunStamp) {
        self.fit_status = Some(result.fit_status);
        self.product_line = Some(result.product_line);
        self.rationale = Some(result.rationale.clone());
        self.score = Some(result.score);
        self.model_run_id = Some(run_id.to_string());
        self.created_at.get_or_insert(stamp.at);
        self.updated_at = Some(stamp.at);
    }
}

/// Counts from merging a run into a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Tags created for keywords seen for the first time.
    pub inserted: usize,
    /// Existing tags whose fields were overwritten.
    pub updated: usize,
}

/// All tags of one client, keyed by normalized keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCollection {
    /// Tags by normalized keyword.
    tags: BTreeMap<String, KeywordTag>,
}

impl TagCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The tag for a normalized keyword.
    pub fn get(&self, keyword: &str) -> Option<&KeywordTag> {
        self.tags.get(keyword)
    }

    /// Mutable access to the tag for a normalized keyword.
    pub fn get_mut(&mut self, keyword: &str) -> Option<&mut KeywordTag> {
        self.tags.get_mut(keyword)
    }

    /// Tags in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordTag)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tags per fit status. Entries without a verdict are not counted.
    pub fn status_counts(&self) -> BTreeMap<FitStatus, usize> {
        let mut counts = BTreeMap::new();
        for status in self.tags.values().filter_map(|tag| tag.fit_status) {
            *counts.entry(status).or_insert(0) += 1;
        }
        counts
    }

    /// Merges a run's classifications.
    ///
    /// Tags for keywords outside the run are untouched. For keywords in the run the tag
    /// fields are overwritten while `createdAt` and fields owned by other tools are kept.
    /// Blank keywords are not stored.
    pub fn merge(&mut self, results: &[Classification], stamp: &RunStamp) -> MergeStats {
        let mut stats = MergeStats::default();
        let run_id = stamp.model_run_id.to_string();

        for result in results {
            if result.normalized.is_empty() {
                continue;
            }
            if let Some(tag) = self.tags.get_mut(&result.normalized) {
                tag.apply(result, &run_id, stamp);
                stats.updated += 1;
            } else {
                let mut tag = KeywordTag::default();
                tag.apply(result, &run_id, stamp);
                self.tags.insert(result.normalized.clone(), tag);
                stats.inserted += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use kwfit_classify::Signals;

    use super::*;

    fn classification(keyword: &str, status: FitStatus) -> Classification {
        Classification {
            normalized: keyword.to_string(),
            fit_status: status,
            product_line: ProductLine::None,
            rationale: String::from("Pos:twister; PL:NONE"),
            score: 1.0,
            signals: Signals::default(),
        }
    }

    fn stamp(day: u32) -> RunStamp {
        RunStamp {
            model_run_id: Uuid::new_v4(),
            at: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
        }
    }

    const STORED: &str = r#"{
        "yarn twister": {
            "fitStatus": "REVIEW",
            "productLine": "NONE",
            "rationale": "Amb:spindle[no-anchor]",
            "score": 0.0,
            "modelRunId": "old-run",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
            "tag2Status": "APPROVED"
        },
        "toy rug": {
            "fitStatus": "NO_MATCH",
            "productLine": "NONE",
            "rationale": "Neg:rug",
            "score": -5.0,
            "modelRunId": "old-run",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }
    }"#;

    #[test]
    fn merge_preserves_foreign_fields_and_created_at() {
        let mut tags: TagCollection = serde_json::from_str(STORED).unwrap();
        let run = stamp(2);

        let stats = tags.merge(
            &[
                classification("yarn twister", FitStatus::CoreMatch),
                classification("heat setting", FitStatus::CoreMatch),
            ],
            &run,
        );
        assert_eq!(stats, MergeStats { inserted: 1, updated: 1 });
        assert_eq!(tags.len(), 3);

        let updated = tags.get("yarn twister").unwrap();
        assert_eq!(updated.fit_status, Some(FitStatus::CoreMatch));
        assert_eq!(updated.extra["tag2Status"], "APPROVED");
        assert_eq!(
            updated.created_at.unwrap().to_rfc3339(),
            "2025-01-01T00:00:00+00:00"
        );
        assert_eq!(updated.updated_at, Some(run.at));
        assert_eq!(updated.model_run_id, Some(run.model_run_id.to_string()));

        let untouched = tags.get("toy rug").unwrap();
        assert_eq!(untouched.model_run_id.as_deref(), Some("old-run"));

        let inserted = tags.get("heat setting").unwrap();
        assert_eq!(inserted.created_at, Some(run.at));
        assert!(inserted.extra.is_empty());
    }

    #[test]
    fn foreign_fields_survive_serialization() {
        let mut tags: TagCollection = serde_json::from_str(STORED).unwrap();
        tags.merge(&[classification("yarn twister", FitStatus::BrandKw)], &stamp(3));

        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(json["yarn twister"]["tag2Status"], "APPROVED");
        assert_eq!(json["yarn twister"]["fitStatus"], "BRAND_KW");
    }

    #[test]
    fn entries_written_only_by_other_tools_load_and_merge() {
        let mut tags: TagCollection = serde_json::from_str(
            r#"{
                "yarn twister": {"tag2Status": "APPROVED"},
                "carpet loom": {"tag2Status": "REJECTED", "reviewer": "ops"}
            }"#,
        )
        .unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.status_counts().is_empty());

        let run = stamp(5);
        let stats = tags.merge(&[classification("yarn twister", FitStatus::CoreMatch)], &run);
        assert_eq!(stats, MergeStats { inserted: 0, updated: 1 });

        let merged = tags.get("yarn twister").unwrap();
        assert_eq!(merged.fit_status, Some(FitStatus::CoreMatch));
        assert_eq!(merged.created_at, Some(run.at));
        assert_eq!(merged.extra["tag2Status"], "APPROVED");

        // The untouched entry is written back exactly as it was read
        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(
            json["carpet loom"],
            serde_json::json!({"tag2Status": "REJECTED", "reviewer": "ops"})
        );
        assert_eq!(json["yarn twister"]["fitStatus"], "CORE_MATCH");
    }

    #[test]
    fn blank_keywords_are_not_stored() {
        let mut tags = TagCollection::new();
        let stats = tags.merge(&[classification("", FitStatus::Blank)], &stamp(4));
        assert_eq!(stats, MergeStats::default());
        assert!(tags.is_empty());
    }

    #[test]
    fn counts_by_status() {
        let tags: TagCollection = serde_json::from_str(STORED).unwrap();
        let counts = tags.status_counts();
        assert_eq!(counts[&FitStatus::Review], 1);
        assert_eq!(counts[&FitStatus::NoMatch], 1);
    }
}
