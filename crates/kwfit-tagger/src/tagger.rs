//! The batch tagging driver.

use std::collections::{BTreeMap, HashSet};

use kwfit_classify::{Classification, ClassifyError, Classifier};
use kwfit_config::{Config, MatchingSettings, ScoringSettings};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    CancelFlag, DictionaryStore, KeywordFilter, KeywordSource, RationaleSample, RecordFailure,
    RunStamp, TagError, TagRunReport, TagStore,
};

/// A unique keyword queued for classification.
struct Pending {
    /// Keyword as first seen.
    keyword: String,
    /// Normalized form used as the tag key.
    normalized: String,
}

/// Runs the classifier over a client's keyword set and merges the results into its tags.
pub struct Tagger<'a, S> {
    /// Dictionary, keyword and tag storage.
    store: &'a S,
    /// Matching settings.
    matching: MatchingSettings,
    /// Scoring policy.
    scoring: ScoringSettings,
    /// Classify on the rayon pool.
    parallel: bool,
    /// Rationale samples to report.
    sample_size: usize,
    /// Polled between records.
    cancel: CancelFlag,
}

impl<'a, S> Tagger<'a, S>
where
    S: DictionaryStore + KeywordSource + TagStore,
{
    /// Creates a tagger over a store using the configured policy.
    pub fn new(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            matching: config.matching.clone(),
            scoring: config.scoring.clone(),
            parallel: config.settings.parallel,
            sample_size: config.settings.sample_size,
            cancel: CancelFlag::new(),
        }
    }

    /// Overrides the parallel setting.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Uses an externally owned cancellation flag.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle to this tagger's cancellation flag.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Loads and compiles a client's dictionary.
    pub fn classifier(&self, client: &str) -> Result<Classifier, TagError> {
        let loaded = self
            .store
            .load_dictionary(client)
            .map_err(TagError::store)?
            .ok_or_else(|| TagError::NotConfigured {
                client: client.to_string(),
            })?;
        if loaded.migrated {
            info!(client, "dictionary migrated to the current format");
        }

        Classifier::new(&loaded.dictionary, &self.matching, &self.scoring).map_err(|source| {
            TagError::Dictionary {
                client: client.to_string(),
                source,
            }
        })
    }

    /// Tags every keyword of a client that passes the filter.
    ///
    /// Nothing is written when the run fails or is cancelled. A run with no keywords
    /// succeeds without touching the stored tags.
    pub fn tag_all(&self, client: &str, filter: &KeywordFilter) -> Result<TagRunReport, TagError> {
        let stamp = RunStamp::now();
        info!(client, run_id = %stamp.model_run_id, parallel = self.parallel, "starting tagging run");

        let classifier = self.classifier(client)?;
        let records = self.store.keyword_records(client).map_err(TagError::store)?;

        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        let mut total_keywords = 0;
        for record in records.iter().filter(|r| filter.matches(r)) {
            total_keywords += 1;
            let normalized = record.normalized_keyword().into_owned();
            if seen.insert(normalized.clone()) {
                pending.push(Pending {
                    keyword: record.keyword.clone(),
                    normalized,
                });
            }
        }
        debug!(
            client,
            records = records.len(),
            matched = total_keywords,
            unique = pending.len(),
            "loaded keyword records"
        );

        if pending.is_empty() {
            info!(client, "no keywords to tag");
            return Ok(TagRunReport::empty(stamp.model_run_id, stamp.at, total_keywords));
        }

        let outcomes = self.classify_all(&classifier, &pending)?;

        let mut classified = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (item, outcome) in pending.iter().zip(outcomes) {
            match outcome {
                Ok(result) => classified.push(result),
                Err(err) => {
                    warn!(client, keyword = %item.keyword, error = %err, "skipping keyword");
                    failures.push(RecordFailure {
                        keyword: item.keyword.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let mut tags = self.store.load_tags(client).map_err(TagError::store)?;
        let stats = tags.merge(&classified, &stamp);
        self.store
            .save_tags(client, &tags)
            .map_err(TagError::store)?;

        let mut status_counts = BTreeMap::new();
        for result in &classified {
            *status_counts.entry(result.fit_status).or_insert(0) += 1;
        }
        let sample_rationale = classified
            .iter()
            .take(self.sample_size)
            .map(|c| RationaleSample {
                keyword: c.normalized.clone(),
                fit_status: c.fit_status,
                rationale: c.rationale.clone(),
            })
            .collect();

        let report = TagRunReport {
            model_run_id: stamp.model_run_id,
            run_at: stamp.at,
            total_keywords,
            unique_keywords: pending.len(),
            updated: stats.updated,
            inserted: stats.inserted,
            status_counts,
            sample_rationale,
            failures,
        };
        info!(
            client,
            run_id = %stamp.model_run_id,
            unique = report.unique_keywords,
            updated = report.updated,
            inserted = report.inserted,
            failures = report.failures.len(),
            "tagging run finished"
        );
        Ok(report)
    }

    /// Classifies pending keywords in input order.
    fn classify_all(
        &self,
        classifier: &Classifier,
        pending: &[Pending],
    ) -> Result<Vec<Result<Classification, ClassifyError>>, TagError> {
        let cancel = &self.cancel;

        let outcomes: Vec<Option<_>> = if self.parallel {
            pending
                .par_iter()
                .map(|item| {
                    (!cancel.is_cancelled()).then(|| classifier.classify_normalized(&item.normalized))
                })
                .collect()
        } else {
            pending
                .iter()
                .map_while(|item| {
                    (!cancel.is_cancelled()).then(|| classifier.classify_normalized(&item.normalized))
                })
                .map(Some)
                .collect()
        };

        let processed = outcomes.iter().filter(|o| o.is_some()).count();
        if processed < pending.len() {
            info!(processed, total = pending.len(), "tagging run cancelled");
            return Err(TagError::Cancelled { processed });
        }
        Ok(outcomes.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, convert::Infallible};

    use kwfit_classify::FitStatus;
    use kwfit_dictionary::{
        LoadedDictionary, MatchingDictionary, ProductLine, TokenBucket, TokenEntry,
    };

    use super::*;
    use crate::{KeywordRecord, TagCollection};

    /// In-memory store counting writes.
    #[derive(Default)]
    struct MemoryStore {
        dictionaries: HashMap<String, MatchingDictionary>,
        keywords: HashMap<String, Vec<KeywordRecord>>,
        tags: RefCell<HashMap<String, TagCollection>>,
        writes: RefCell<usize>,
    }

    impl DictionaryStore for MemoryStore {
        type Error = Infallible;

        fn load_dictionary(&self, client: &str) -> Result<Option<LoadedDictionary>, Infallible> {
            Ok(self.dictionaries.get(client).map(|d| LoadedDictionary {
                dictionary: d.clone(),
                migrated: false,
            }))
        }

        fn save_dictionary(&self, _: &str, _: &MatchingDictionary) -> Result<(), Infallible> {
            *self.writes.borrow_mut() += 1;
            Ok(())
        }
    }

    impl KeywordSource for MemoryStore {
        type Error = Infallible;

        fn keyword_records(&self, client: &str) -> Result<Vec<KeywordRecord>, Infallible> {
            Ok(self.keywords.get(client).cloned().unwrap_or_default())
        }
    }

    impl TagStore for MemoryStore {
        type Error = Infallible;

        fn load_tags(&self, client: &str) -> Result<TagCollection, Infallible> {
            Ok(self.tags.borrow().get(client).cloned().unwrap_or_default())
        }

        fn save_tags(&self, client: &str, tags: &TagCollection) -> Result<(), Infallible> {
            *self.writes.borrow_mut() += 1;
            self.tags.borrow_mut().insert(client.to_string(), tags.clone());
            Ok(())
        }
    }

    fn acme_dictionary() -> MatchingDictionary {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Brand, TokenEntry::new("acme")).unwrap();
        dict.add_token(TokenBucket::Positive, TokenEntry::new("twister"))
            .unwrap();
        dict.add_token(TokenBucket::Negative, TokenEntry::new("toy")).unwrap();
        dict.set_product_lines("twister", &[ProductLine::Twisting])
            .unwrap();
        dict
    }

    fn record(keyword: &str, location: &str, domain: &str) -> KeywordRecord {
        KeywordRecord {
            location: Some(location.into()),
            domain: Some(domain.into()),
            ..KeywordRecord::new(keyword)
        }
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.dictionaries.insert("acme".into(), acme_dictionary());
        store.keywords.insert(
            "acme".into(),
            vec![
                record("Acme Twister", "us", "acme.com"),
                record("acme twister", "us", "shop.acme.com"),
                record("acme twister toy", "us", "acme.com"),
                record("yarn twister", "de", "acme.de"),
                record("weather", "us", "acme.com"),
            ],
        );
        store
    }

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn tags_unique_keywords() {
        let store = store();
        let report = Tagger::new(&store, &config())
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();

        assert_eq!(report.total_keywords, 5);
        assert_eq!(report.unique_keywords, 4);
        assert_eq!(report.inserted, 4);
        assert_eq!(report.updated, 0);
        assert_eq!(report.status_counts[&FitStatus::BrandKw], 1);
        assert_eq!(report.status_counts[&FitStatus::NoMatch], 2);
        assert_eq!(report.status_counts[&FitStatus::CoreMatch], 1);
        assert_eq!(report.sample_rationale[0].rationale, "Brand:acme; Pos:twister; PL:TWISTING");
        assert!(report.failures.is_empty());

        let tags = store.tags.borrow();
        let tag = tags["acme"].get("acme twister").unwrap();
        assert_eq!(tag.product_line, Some(ProductLine::Twisting));
        assert_eq!(tag.model_run_id, Some(report.model_run_id.to_string()));
    }

    #[test]
    fn filters_apply() {
        let store = store();
        let filter = KeywordFilter::new(Some("US"), &["*.acme.com"]).unwrap();
        let report = Tagger::new(&store, &config())
            .tag_all("acme", &filter)
            .unwrap();
        assert_eq!(report.total_keywords, 1);
        assert_eq!(report.unique_keywords, 1);
    }

    #[test]
    fn missing_dictionary_writes_nothing() {
        let store = store();
        let err = Tagger::new(&store, &config())
            .tag_all("globex", &KeywordFilter::all())
            .unwrap_err();
        assert!(matches!(err, TagError::NotConfigured { client } if client == "globex"));
        assert_eq!(*store.writes.borrow(), 0);
    }

    #[test]
    fn empty_keyword_set_is_success() {
        let mut store = MemoryStore::default();
        store.dictionaries.insert("acme".into(), acme_dictionary());
        let report = Tagger::new(&store, &config())
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();
        assert_eq!(report.unique_keywords, 0);
        assert_eq!(report.classified(), 0);
        assert_eq!(*store.writes.borrow(), 0);
    }

    #[test]
    fn cancelled_run_writes_nothing() {
        let store = store();
        let tagger = Tagger::new(&store, &config());
        tagger.cancel_flag().cancel();

        let err = tagger.tag_all("acme", &KeywordFilter::all()).unwrap_err();
        assert!(matches!(err, TagError::Cancelled { processed: 0 }));
        assert_eq!(*store.writes.borrow(), 0);

        let err = Tagger::new(&store, &config())
            .parallel(true)
            .with_cancel_flag(tagger.cancel_flag())
            .tag_all("acme", &KeywordFilter::all())
            .unwrap_err();
        assert!(matches!(err, TagError::Cancelled { .. }));
        assert!(store.tags.borrow().is_empty());
    }

    #[test]
    fn over_long_keywords_are_recorded_and_skipped() {
        let store = store();
        let mut config = config();
        config.matching.max_keyword_length = 12;

        let report = Tagger::new(&store, &config)
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].keyword, "acme twister toy");
        assert_eq!(report.inserted, 3);
    }

    #[test]
    fn parallel_matches_sequential() {
        let sequential_store = store();
        let sequential = Tagger::new(&sequential_store, &config())
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();

        let parallel_store = store();
        let parallel = Tagger::new(&parallel_store, &config())
            .parallel(true)
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();

        assert_eq!(sequential.status_counts, parallel.status_counts);
        assert_eq!(sequential.sample_rationale, parallel.sample_rationale);
    }

    #[test]
    fn rerun_preserves_foreign_fields() {
        let store = store();
        Tagger::new(&store, &config())
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();

        let created_at = {
            let mut tags = store.tags.borrow_mut();
            let tag = tags.get_mut("acme").unwrap().get_mut("yarn twister").unwrap();
            tag.extra
                .insert("tag2Status".into(), serde_json::Value::from("APPROVED"));
            tag.created_at
        };

        let report = Tagger::new(&store, &config())
            .tag_all("acme", &KeywordFilter::all())
            .unwrap();
        assert_eq!(report.updated, 4);
        assert_eq!(report.inserted, 0);

        let tags = store.tags.borrow();
        let tag = tags["acme"].get("yarn twister").unwrap();
        assert_eq!(tag.extra["tag2Status"], "APPROVED");
        assert_eq!(tag.created_at, created_at);
        assert_eq!(tag.model_run_id, Some(report.model_run_id.to_string()));
    }
}
