//! The classifier facade.

use kwfit_config::{MatchingSettings, ScoringSettings};
use kwfit_dictionary::{MatchingDictionary, ProductLine, normalize};
use serde::Serialize;

use crate::{
    ClassifyError, CompiledDictionary, FitStatus, Signals, assign_product_line, decide,
    rationale::{BLANK, render_rationale},
    score,
};

/// The verdict for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// The keyword as classified, after normalization.
    pub normalized: String,
    /// Fit verdict.
    pub fit_status: FitStatus,
    /// Assigned product line.
    pub product_line: ProductLine,
    /// Trace of the rules that fired.
    pub rationale: String,
    /// Signed score.
    pub score: f64,
    /// Per-bucket matches behind the score.
    pub signals: Signals,
}

/// A compiled dictionary paired with the policy used to judge keywords.
///
/// Classification is a pure function of the dictionary snapshot, the settings, and the
/// keyword, so a `Classifier` can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Compiled token matchers.
    dictionary: CompiledDictionary,
    /// Weights and thresholds.
    scoring: ScoringSettings,
    /// Longest keyword accepted, in characters.
    max_keyword_length: usize,
}

impl Classifier {
    /// Compiles a dictionary into a classifier.
    pub fn new(
        dictionary: &MatchingDictionary,
        matching: &MatchingSettings,
        scoring: &ScoringSettings,
    ) -> Result<Self, ClassifyError> {
        Ok(Self {
            dictionary: CompiledDictionary::compile(dictionary, matching)?,
            scoring: scoring.clone(),
            max_keyword_length: matching.max_keyword_length,
        })
    }

    /// The compiled dictionary.
    pub fn dictionary(&self) -> &CompiledDictionary {
        &self.dictionary
    }

    /// Normalizes and classifies a raw keyword.
    pub fn classify(&self, keyword: &str) -> Result<Classification, ClassifyError> {
        self.classify_normalized(&normalize(keyword))
    }

    /// Classifies a keyword that is already normalized.
    ///
    /// Fails only when the keyword is longer than the configured limit.
    pub fn classify_normalized(&self, normalized: &str) -> Result<Classification, ClassifyError> {
        let length = normalized.chars().count();
        if length > self.max_keyword_length {
            return Err(ClassifyError::KeywordTooLong {
                length,
                max: self.max_keyword_length,
            });
        }

        if normalized.is_empty() {
            return Ok(Classification {
                normalized: String::new(),
                fit_status: FitStatus::Blank,
                product_line: ProductLine::None,
                rationale: BLANK.to_string(),
                score: 0.0,
                signals: Signals::default(),
            });
        }

        let signals = score(&self.dictionary, normalized, &self.scoring);
        let fit_status = decide(&signals, &self.scoring);
        let product_line = assign_product_line(fit_status, &signals, &self.dictionary);
        let rationale = render_rationale(&signals, fit_status, product_line);

        Ok(Classification {
            normalized: normalized.to_string(),
            fit_status,
            product_line,
            rationale,
            score: signals.score,
            signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use kwfit_dictionary::{TokenBucket, TokenEntry};

    use super::*;

    /// brand "acme", positive "twister" (TWISTING), soft negative "toy".
    fn acme() -> MatchingDictionary {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Brand, TokenEntry::new("acme")).unwrap();
        dict.add_token(TokenBucket::Positive, TokenEntry::new("twister"))
            .unwrap();
        dict.add_token(TokenBucket::Negative, TokenEntry::new("toy")).unwrap();
        dict.set_product_lines("twister", &[ProductLine::Twisting])
            .unwrap();
        dict
    }

    fn classifier(dict: &MatchingDictionary) -> Classifier {
        Classifier::new(dict, &MatchingSettings::default(), &ScoringSettings::default()).unwrap()
    }

    #[test]
    fn brand_positive_and_negative_is_no_match() {
        let result = classifier(&acme()).classify("acme twister toy").unwrap();
        assert!((result.score - 6.0).abs() < f64::EPSILON);
        assert_eq!(result.fit_status, FitStatus::NoMatch);
        assert_eq!(result.product_line, ProductLine::None);
        assert_eq!(result.rationale, "Brand:acme; Pos:twister; Neg:toy");
    }

    #[test]
    fn brand_with_positive_is_brand_keyword() {
        let result = classifier(&acme()).classify("Acme Twister").unwrap();
        assert!((result.score - 11.0).abs() < f64::EPSILON);
        assert_eq!(result.fit_status, FitStatus::BrandKw);
        assert_eq!(result.product_line, ProductLine::Twisting);
        assert_eq!(result.rationale, "Brand:acme; Pos:twister; PL:TWISTING");
        assert_eq!(result.normalized, "acme twister");
    }

    #[test]
    fn hard_negative_vetoes_brand() {
        let mut dict = acme();
        dict.add_token(TokenBucket::Negative, TokenEntry::new("toy").hard_negative())
            .unwrap();
        let result = classifier(&dict).classify("acme twister toy").unwrap();
        assert_eq!(result.fit_status, FitStatus::NoMatch);
        assert_eq!(result.rationale, "HardNeg:toy");
    }

    #[test]
    fn short_negative_does_not_fire_inside_words() {
        let mut dict = acme();
        dict.add_token(TokenBucket::Negative, TokenEntry::new("rug")).unwrap();
        let result = classifier(&dict).classify("twister drugs").unwrap();
        assert_eq!(result.fit_status, FitStatus::CoreMatch);
        assert!(result.signals.negative.is_empty());
    }

    #[test]
    fn ambiguous_without_anchor_never_core() {
        let mut dict = MatchingDictionary::new();
        dict.add_token(TokenBucket::Ambiguous, TokenEntry::new("spindle"))
            .unwrap();
        dict.add_token(TokenBucket::Ambiguous, TokenEntry::new("bobbin"))
            .unwrap();
        dict.add_token(TokenBucket::Anchor, TokenEntry::new("yarn")).unwrap();
        let classifier = classifier(&dict);

        let alone = classifier.classify("spindle bobbin").unwrap();
        assert_eq!(alone.fit_status, FitStatus::Review);
        assert!(alone.score.abs() < f64::EPSILON);

        let anchored = classifier.classify("yarn spindle bobbin").unwrap();
        assert_eq!(anchored.fit_status, FitStatus::CoreMatch);
        assert_eq!(anchored.rationale, "Amb:spindle,bobbin[anchor:yarn]; PL:NONE");
    }

    #[test]
    fn blank_keyword() {
        let result = classifier(&acme()).classify("  ?! ").unwrap();
        assert_eq!(result.fit_status, FitStatus::Blank);
        assert_eq!(result.rationale, "Blank");
    }

    #[test]
    fn unrelated_keyword_has_no_signals() {
        let result = classifier(&acme()).classify("weather today").unwrap();
        assert_eq!(result.fit_status, FitStatus::NoMatch);
        assert_eq!(result.rationale, "NoSignals");
    }

    #[test]
    fn over_long_keyword_fails() {
        let matching = MatchingSettings {
            max_keyword_length: 5,
            ..MatchingSettings::default()
        };
        let classifier =
            Classifier::new(&acme(), &matching, &ScoringSettings::default()).unwrap();
        let err = classifier.classify("acme twister").unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::KeywordTooLong { length: 12, max: 5 }
        ));
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = classifier(&acme());
        let first = classifier.classify("acme twister toy").unwrap();
        for _ in 0..10 {
            assert_eq!(classifier.classify("acme twister toy").unwrap(), first);
        }
    }

    #[test]
    fn serializes_camel_case() {
        let result = classifier(&acme()).classify("acme twister").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fitStatus"], "BRAND_KW");
        assert_eq!(json["productLine"], "TWISTING");
        assert_eq!(json["signals"]["brand"][0], "acme");
    }
}
