//! Detection pipeline
//!
//! The detector normalizes input text, consults the rule engine for a
//! short-circuit decision or a filtered candidate set, scores the surviving
//! candidates across n-gram orders 1 through 5, and turns the summed
//! log-probabilities into relative confidences under the configured
//! minimum-distance policy.

use crate::config::DetectorConfig;
use crate::language::Language;
use crate::model::{DirectoryModelSource, ModelSource, ModelStore, NgramOrder};
use crate::ngram::TestDataModel;
use crate::rules::RuleEngine;
use crate::{scorer, Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{P}").unwrap());
static NUMBERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{N}").unwrap());
static MULTIPLE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NO_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\P{L}+$").unwrap());

/// Detects the most likely language of a text.
///
/// Built once via [`LanguageDetectorBuilder`] and safe to share across any
/// number of threads; training models materialize on first use and are
/// retained for the detector's lifetime.
pub struct LanguageDetector {
    languages: BTreeSet<Language>,
    minimum_relative_distance: f64,
    rules: RuleEngine,
    store: ModelStore,
}

impl LanguageDetector {
    /// The languages this detector may report.
    pub fn supported_languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.iter().copied()
    }

    /// The configured confidence margin below which `detect` reports
    /// [`Language::Unknown`].
    pub fn minimum_relative_distance(&self) -> f64 {
        self.minimum_relative_distance
    }

    /// The most likely language of `text`, or [`Language::Unknown`] when the
    /// input carries no usable evidence, the top two candidates tie, or the
    /// winner's margin is below the configured minimum relative distance.
    pub fn detect(&self, text: &str) -> Language {
        let values = self.confidence_values(text);
        match values.as_slice() {
            [] => Language::Unknown,
            [(language, _)] => *language,
            [(first, top), (_, second), ..] => {
                if top == second {
                    Language::Unknown
                } else if top - second >= self.minimum_relative_distance {
                    *first
                } else {
                    Language::Unknown
                }
            }
        }
    }

    /// Relative confidences for every language with evidence, descending.
    ///
    /// The best-scoring language is always 1.0 and the others fall into
    /// (0, 1); the values are comparable only to each other, never across
    /// calls. Equal confidences are ordered by the language catalog.
    pub fn confidence_values(&self, text: &str) -> Vec<(Language, f64)> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() || NO_LETTER.is_match(&cleaned) {
            debug!("No letters left after cleaning, nothing to detect");
            return Vec::new();
        }

        let words: Vec<&str> = cleaned.split(' ').collect();

        let rule_decision = self.rules.detect_by_rules(&words);
        if rule_decision != Language::Unknown {
            return vec![(rule_decision, 1.0)];
        }

        let mut candidates = self.rules.filter_candidates(&words);
        debug!("Scoring candidates: {:?}", candidates);

        let text_length = cleaned.chars().count();
        let mut summed_scores: BTreeMap<Language, f64> = BTreeMap::new();
        let mut unigram_hits: BTreeMap<Language, usize> = BTreeMap::new();

        for order in NgramOrder::ALL {
            if text_length < order.length() || candidates.is_empty() {
                break;
            }
            let test_model = TestDataModel::new(&cleaned, order.length());
            if order == NgramOrder::Unigram {
                for &language in &candidates {
                    let hits = scorer::count_unigram_hits(&self.store, language, &test_model);
                    if hits > 0 {
                        unigram_hits.insert(language, hits);
                    }
                }
            }
            let probabilities = scorer::language_probabilities(&self.store, &test_model, &candidates);
            if !probabilities.is_empty() {
                candidates.retain(|language| probabilities.contains_key(language));
                for (language, score) in probabilities {
                    *summed_scores.entry(language).or_insert(0.0) += score;
                }
            }
        }

        let mut scores: Vec<(Language, f64)> = Vec::with_capacity(candidates.len());
        for &language in &candidates {
            let mut score = summed_scores.get(&language).copied().unwrap_or(0.0);
            if let Some(&hits) = unigram_hits.get(&language) {
                score /= hits as f64;
            }
            if score != 0.0 {
                scores.push((language, score));
            }
        }
        if scores.is_empty() {
            return Vec::new();
        }

        // Scores are negative log-probability sums, so the maximum is the
        // one closest to zero and max / score lands in (0, 1] with the best
        // language at exactly 1.0.
        let max_score = scores
            .iter()
            .map(|(_, score)| *score)
            .fold(f64::NEG_INFINITY, f64::max);
        let mut confidences: Vec<(Language, f64)> = scores
            .into_iter()
            .map(|(language, score)| (language, max_score / score))
            .collect();
        confidences.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        confidences
    }
}

impl PartialEq for LanguageDetector {
    fn eq(&self, other: &Self) -> bool {
        self.languages == other.languages
            && self.minimum_relative_distance == other.minimum_relative_distance
    }
}

impl Eq for LanguageDetector {}

impl Hash for LanguageDetector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.languages.hash(state);
        self.minimum_relative_distance.to_bits().hash(state);
    }
}

impl fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDetector")
            .field("languages", &self.languages)
            .field("minimum_relative_distance", &self.minimum_relative_distance)
            .finish()
    }
}

/// Configures and builds a [`LanguageDetector`].
pub struct LanguageDetectorBuilder {
    languages: BTreeSet<Language>,
    minimum_relative_distance: f64,
    source: Option<Arc<dyn ModelSource>>,
    preload_models: bool,
}

impl LanguageDetectorBuilder {
    /// Starts from the whole language catalog.
    pub fn from_all_languages() -> Self {
        Self::new(Language::all().iter().copied().collect())
    }

    /// Starts from an explicit language set.
    ///
    /// # Panics
    /// An empty set or one containing [`Language::Unknown`] is a programmer
    /// error.
    pub fn from_languages(languages: &[Language]) -> Self {
        assert!(
            !languages.is_empty(),
            "a detector needs at least one language"
        );
        assert!(
            !languages.contains(&Language::Unknown),
            "the Unknown sentinel cannot be a detection candidate"
        );
        Self::new(languages.iter().copied().collect())
    }

    /// Starts from ISO 639-1 codes; unknown codes are a configuration error.
    pub fn from_iso_codes(codes: &[&str]) -> Result<Self> {
        let mut languages = BTreeSet::new();
        for code in codes {
            let language = Language::from_iso_code_639_1(code)
                .ok_or_else(|| Error::Config(format!("unknown ISO 639-1 code {code:?}")))?;
            languages.insert(language);
        }
        if languages.is_empty() {
            return Err(Error::Config("a detector needs at least one language".into()));
        }
        Ok(Self::new(languages))
    }

    /// Starts from a loaded [`DetectorConfig`]; an empty language list means
    /// the whole catalog.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        if config.languages.contains(&Language::Unknown) {
            return Err(Error::Config(
                "the Unknown sentinel cannot be a detection candidate".into(),
            ));
        }
        if !(0.0..=0.99).contains(&config.minimum_relative_distance) {
            return Err(Error::Config(format!(
                "minimum relative distance must be in [0.0, 0.99], got {}",
                config.minimum_relative_distance
            )));
        }
        let builder = if config.languages.is_empty() {
            Self::from_all_languages()
        } else {
            Self::new(config.languages.iter().copied().collect())
        };
        Ok(builder
            .with_minimum_relative_distance(config.minimum_relative_distance)
            .with_model_directory(&config.model_directory))
    }

    fn new(languages: BTreeSet<Language>) -> Self {
        Self {
            languages,
            minimum_relative_distance: 0.0,
            source: None,
            preload_models: false,
        }
    }

    /// The confidence margin the top language must clear; defaults to 0.0.
    ///
    /// # Panics
    /// Values outside [0.0, 0.99] are a programmer error.
    pub fn with_minimum_relative_distance(mut self, distance: f64) -> Self {
        assert!(
            (0.0..=0.99).contains(&distance),
            "minimum relative distance must be in [0.0, 0.99], got {distance}"
        );
        self.minimum_relative_distance = distance;
        self
    }

    /// Reads models through a custom source instead of the default
    /// directory layout.
    pub fn with_model_source(mut self, source: Arc<dyn ModelSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Reads models from `<root>/language-models/<iso-639-1>/<order>s.json`.
    pub fn with_model_directory(self, root: impl Into<PathBuf>) -> Self {
        self.with_model_source(Arc::new(DirectoryModelSource::new(root)))
    }

    /// Materializes every training model at build time instead of on first
    /// use.
    pub fn with_preloaded_models(mut self) -> Self {
        self.preload_models = true;
        self
    }

    pub fn build(self) -> LanguageDetector {
        info!(
            "Initializing language detector for {} languages",
            self.languages.len()
        );
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(DirectoryModelSource::new(".")));
        let store = ModelStore::new(source, &self.languages);
        if self.preload_models {
            store.preload();
        }
        LanguageDetector {
            rules: RuleEngine::new(self.languages.clone()),
            languages: self.languages,
            minimum_relative_distance: self.minimum_relative_distance,
            store,
        }
    }
}

/// Trims, lowercases, strips punctuation and digits, and collapses
/// whitespace runs to a single space.
fn clean_text(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let without_punctuation = PUNCTUATION.replace_all(&lowered, "");
    let without_digits = NUMBERS.replace_all(&without_punctuation, "");
    let collapsed = MULTIPLE_WHITESPACE.replace_all(&without_digits, " ");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hello, World! 42 "), "hello world");
        assert_eq!(clean_text("Привет,\t\tмир..."), "привет мир");
        assert_eq!(clean_text("   12345 !!! "), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_clean_text_folds_case_unicode_aware() {
        assert_eq!(clean_text("STRASSE UND STRAßE"), "strasse und straße");
        assert_eq!(clean_text("ΕΛΛΗΝΙΚΆ"), "ελληνικά");
    }

    #[test]
    #[should_panic(expected = "minimum relative distance")]
    fn test_builder_rejects_out_of_range_distance() {
        LanguageDetectorBuilder::from_languages(&[Language::English, Language::German])
            .with_minimum_relative_distance(1.0);
    }

    #[test]
    #[should_panic(expected = "at least one language")]
    fn test_builder_rejects_empty_language_set() {
        LanguageDetectorBuilder::from_languages(&[]);
    }

    #[test]
    #[should_panic(expected = "Unknown sentinel")]
    fn test_builder_rejects_unknown_sentinel() {
        LanguageDetectorBuilder::from_languages(&[Language::English, Language::Unknown]);
    }

    #[test]
    fn test_builder_from_iso_codes() {
        let builder = LanguageDetectorBuilder::from_iso_codes(&["en", "de"]).unwrap();
        let detector = builder.build();
        let languages: Vec<Language> = detector.supported_languages().collect();
        assert_eq!(languages, vec![Language::English, Language::German]);

        assert!(LanguageDetectorBuilder::from_iso_codes(&["en", "xx"]).is_err());
        assert!(LanguageDetectorBuilder::from_iso_codes(&[]).is_err());
    }

    #[test]
    fn test_builder_from_config() {
        let config = DetectorConfig {
            languages: vec![Language::Spanish, Language::English],
            minimum_relative_distance: 0.2,
            model_directory: "/opt/models".into(),
        };
        let detector = LanguageDetectorBuilder::from_config(&config).unwrap().build();
        let languages: Vec<Language> = detector.supported_languages().collect();
        assert_eq!(languages, vec![Language::English, Language::Spanish]);
        assert_eq!(detector.minimum_relative_distance(), 0.2);

        let all = LanguageDetectorBuilder::from_config(&DetectorConfig::default())
            .unwrap()
            .build();
        assert_eq!(all.supported_languages().count(), Language::all().len());

        let out_of_range = DetectorConfig {
            minimum_relative_distance: 1.5,
            ..DetectorConfig::default()
        };
        assert!(LanguageDetectorBuilder::from_config(&out_of_range).is_err());

        let with_sentinel = DetectorConfig {
            languages: vec![Language::Unknown],
            ..DetectorConfig::default()
        };
        assert!(LanguageDetectorBuilder::from_config(&with_sentinel).is_err());
    }

    #[test]
    fn test_detector_equality_ignores_model_source() {
        let a = LanguageDetectorBuilder::from_languages(&[Language::English, Language::German])
            .with_minimum_relative_distance(0.25)
            .with_model_directory("/somewhere")
            .build();
        let b = LanguageDetectorBuilder::from_languages(&[Language::German, Language::English])
            .with_minimum_relative_distance(0.25)
            .with_model_directory("/elsewhere")
            .build();
        let c = LanguageDetectorBuilder::from_languages(&[Language::English, Language::German])
            .with_minimum_relative_distance(0.5)
            .build();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let hash = |detector: &LanguageDetector| {
            use std::hash::{DefaultHasher, Hash, Hasher};
            let mut hasher = DefaultHasher::new();
            detector.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }
}
