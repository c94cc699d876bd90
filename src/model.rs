//! Training model storage
//!
//! Per-language, per-order frequency tables, materialized lazily on first
//! use and immutable afterwards. The on-disk boundary with the training
//! pipeline is a JSON document per (language, order) pair mapping each
//! n-gram to a relative frequency, written either as a decimal or as a
//! rational fraction `"a/b"` that is expanded at load time.

use crate::language::Language;
use crate::ngram::MAX_NGRAM_LENGTH;
use crate::{Error, Result};
use ahash::AHashMap;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// An n-gram order the engine scores, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NgramOrder {
    Unigram,
    Bigram,
    Trigram,
    Quadrigram,
    Fivegram,
}

impl NgramOrder {
    /// All orders, ascending.
    pub const ALL: [NgramOrder; MAX_NGRAM_LENGTH] = [
        NgramOrder::Unigram,
        NgramOrder::Bigram,
        NgramOrder::Trigram,
        NgramOrder::Quadrigram,
        NgramOrder::Fivegram,
    ];

    /// The n-gram length of this order.
    pub fn length(self) -> usize {
        match self {
            NgramOrder::Unigram => 1,
            NgramOrder::Bigram => 2,
            NgramOrder::Trigram => 3,
            NgramOrder::Quadrigram => 4,
            NgramOrder::Fivegram => 5,
        }
    }

    /// # Panics
    /// Lengths outside 1..=5 are a programmer error.
    pub fn from_length(length: usize) -> Self {
        match length {
            1 => NgramOrder::Unigram,
            2 => NgramOrder::Bigram,
            3 => NgramOrder::Trigram,
            4 => NgramOrder::Quadrigram,
            5 => NgramOrder::Fivegram,
            _ => panic!("unsupported ngram length {length}, must be in 1..={MAX_NGRAM_LENGTH}"),
        }
    }

    /// The resource file name for this order.
    pub fn file_name(self) -> &'static str {
        match self {
            NgramOrder::Unigram => "unigrams.json",
            NgramOrder::Bigram => "bigrams.json",
            NgramOrder::Trigram => "trigrams.json",
            NgramOrder::Quadrigram => "quadrigrams.json",
            NgramOrder::Fivegram => "fivegrams.json",
        }
    }
}

/// The boundary with the model catalog: reads the persisted document for one
/// (language, order) pair.
pub trait ModelSource: Send + Sync {
    fn read(&self, language: Language, order: NgramOrder) -> Result<String>;
}

/// Reads models from a directory tree laid out as
/// `<root>/language-models/<iso-639-1>/<order>s.json`.
pub struct DirectoryModelSource {
    root: PathBuf,
}

impl DirectoryModelSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelSource for DirectoryModelSource {
    fn read(&self, language: Language, order: NgramOrder) -> Result<String> {
        let path = self
            .root
            .join("language-models")
            .join(language.iso_code_639_1())
            .join(order.file_name());
        std::fs::read_to_string(&path).map_err(|e| Error::ModelResource {
            language,
            order,
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

/// A stored frequency: a decimal, or a rational `"a/b"` expanded at load time.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFrequency {
    Decimal(f64),
    Rational(String),
}

impl StoredFrequency {
    fn expand(&self) -> Result<f64> {
        match self {
            StoredFrequency::Decimal(value) => Ok(*value),
            StoredFrequency::Rational(text) => {
                let (numerator, denominator) = text
                    .split_once('/')
                    .ok_or_else(|| Error::InvalidFrequency(text.clone()))?;
                let numerator: f64 = numerator
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidFrequency(text.clone()))?;
                let denominator: f64 = denominator
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidFrequency(text.clone()))?;
                if denominator == 0.0 {
                    return Err(Error::InvalidFrequency(text.clone()));
                }
                Ok(numerator / denominator)
            }
        }
    }
}

/// An immutable frequency table for one (language, order) pair.
pub(crate) struct TrainingModel {
    frequencies: AHashMap<String, f64>,
}

impl TrainingModel {
    /// Decodes a model document. Every frequency must lie in (0, 1]; the
    /// training pipeline guarantees this, so a violation means a corrupt
    /// resource.
    pub(crate) fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, StoredFrequency> = serde_json::from_str(json)?;
        let mut frequencies = AHashMap::with_capacity(raw.len());
        for (ngram, stored) in raw {
            let frequency = stored.expand()?;
            if !(frequency > 0.0 && frequency <= 1.0) {
                return Err(Error::InvalidFrequency(format!(
                    "{frequency} for {ngram:?}, must be in (0, 1]"
                )));
            }
            frequencies.insert(ngram, frequency);
        }
        Ok(Self { frequencies })
    }

    /// The stored frequency, or 0.0 for an absent key.
    pub(crate) fn frequency(&self, ngram: &str) -> f64 {
        self.frequencies.get(ngram).copied().unwrap_or(0.0)
    }
}

/// Lazily materialized per-order frequency tables for the detector's
/// configured languages.
///
/// The maps themselves are built once at construction and never mutated;
/// each cell materializes at most once under contention and is a lock-free
/// read afterwards.
pub(crate) struct ModelStore {
    source: Arc<dyn ModelSource>,
    tables: [BTreeMap<Language, OnceLock<TrainingModel>>; MAX_NGRAM_LENGTH],
}

impl ModelStore {
    pub(crate) fn new(source: Arc<dyn ModelSource>, languages: &BTreeSet<Language>) -> Self {
        let tables = std::array::from_fn(|_| {
            languages
                .iter()
                .map(|&language| (language, OnceLock::new()))
                .collect()
        });
        Self { source, tables }
    }

    /// The relative frequency of `ngram` in the training model of `language`
    /// at the ngram's own order. Absent keys are 0.0.
    ///
    /// # Panics
    /// Panics on an empty ngram or one longer than five characters, on a
    /// language that is not a configured candidate, and on a model resource
    /// that cannot be read or decoded.
    pub(crate) fn relative_frequency(&self, language: Language, ngram: &str) -> f64 {
        let length = ngram.chars().count();
        assert!(length > 0, "the empty ngram must never be queried");
        let order = NgramOrder::from_length(length);
        self.table(language, order).frequency(ngram)
    }

    /// Eagerly materializes every (language, order) table.
    pub(crate) fn preload(&self) {
        for order in NgramOrder::ALL {
            for &language in self.tables[order.length() - 1].keys() {
                self.table(language, order);
            }
        }
    }

    fn table(&self, language: Language, order: NgramOrder) -> &TrainingModel {
        let cell = self.tables[order.length() - 1]
            .get(&language)
            .unwrap_or_else(|| panic!("{language:?} is not a configured scoring candidate"));
        cell.get_or_init(|| {
            debug!("Materializing {:?} {:?} model", language, order);
            let model = self
                .source
                .read(language, order)
                .and_then(|json| TrainingModel::from_json(&json));
            match model {
                Ok(model) => model,
                // The model catalog ships with the artifact; failing to load
                // part of it is a packaging bug, not a runtime condition.
                Err(e) => panic!("failed to materialize the {language:?} {order:?} model: {e}"),
            }
        })
    }
}
