//! Natural language identification from text
//!
//! Given a snippet of text, report the most likely language drawn from a
//! configured set, or [`Language::Unknown`] when the evidence is
//! insufficient or ambiguous.
//!
//! # Architecture
//!
//! ```text
//! Text → Clean → Rule Engine → Candidate Filter → N-gram Scoring → Ranking
//!                    ↓                                  ↓
//!              script evidence              per-language frequency models
//!              (may short-circuit)          (lazily materialized, 1..5-grams)
//! ```
//!
//! Script and character rules decide unambiguous inputs outright; everything
//! else is scored against per-language n-gram frequency models with
//! longest-prefix backoff, and the summed log-probabilities are published as
//! relative confidences where the best language is always 1.0.
//!
//! # Example
//!
//! ```no_run
//! use polyglot::{Language, LanguageDetectorBuilder};
//!
//! let detector = LanguageDetectorBuilder::from_languages(&[
//!     Language::English,
//!     Language::French,
//!     Language::Spanish,
//! ])
//! .with_minimum_relative_distance(0.1)
//! .build();
//!
//! assert_eq!(detector.detect("languages are awesome"), Language::English);
//! ```

pub mod alphabet;
pub mod config;
pub mod detector;
pub mod error;
pub mod language;
pub mod logging;
pub mod model;

mod ngram;
mod rules;
mod scorer;

// Re-exports for convenience
pub use alphabet::Alphabet;
pub use config::{load_config, save_config, DetectorConfig};
pub use detector::{LanguageDetector, LanguageDetectorBuilder};
pub use error::{Error, Result};
pub use language::Language;
pub use model::{DirectoryModelSource, ModelSource, NgramOrder};
