//! Language catalog
//!
//! The closed set of languages the detector can report, along with the
//! static metadata the rule engine and model store consume: ISO 639-1
//! codes, the scripts each language is written in, and characters that
//! occur in exactly one language of the catalog.

use crate::alphabet::Alphabet;
use serde::{Deserialize, Serialize};

/// A language the detector can report.
///
/// The declaration order is the canonical catalog order; it is used as the
/// deterministic tie-break wherever confidence values or tallies are equal.
/// `Unknown` is a sentinel for insufficient or ambiguous evidence; it has no
/// model and is never a scoring candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    Arabic,
    Bulgarian,
    Chinese,
    English,
    French,
    German,
    Greek,
    Hebrew,
    Hindi,
    Italian,
    Japanese,
    Korean,
    Marathi,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Thai,
    Turkish,
    Ukrainian,
    Unknown,
}

use Language::*;

const ALL: [Language; 20] = [
    Arabic, Bulgarian, Chinese, English, French, German, Greek, Hebrew, Hindi, Italian, Japanese,
    Korean, Marathi, Polish, Portuguese, Russian, Spanish, Thai, Turkish, Ukrainian,
];

impl Language {
    /// All catalog languages in canonical order, excluding the `Unknown` sentinel.
    pub fn all() -> &'static [Language] {
        &ALL
    }

    /// The ISO 639-1 code, used as the model lookup key.
    ///
    /// # Panics
    /// Panics for the `Unknown` sentinel, which has no code and no model.
    pub fn iso_code_639_1(&self) -> &'static str {
        match self {
            Arabic => "ar",
            Bulgarian => "bg",
            Chinese => "zh",
            English => "en",
            French => "fr",
            German => "de",
            Greek => "el",
            Hebrew => "he",
            Hindi => "hi",
            Italian => "it",
            Japanese => "ja",
            Korean => "ko",
            Marathi => "mr",
            Polish => "pl",
            Portuguese => "pt",
            Russian => "ru",
            Spanish => "es",
            Thai => "th",
            Turkish => "tr",
            Ukrainian => "uk",
            Unknown => panic!("the Unknown sentinel has no ISO 639-1 code"),
        }
    }

    /// Look up a catalog language by its ISO 639-1 code.
    pub fn from_iso_code_639_1(code: &str) -> Option<Language> {
        Self::all()
            .iter()
            .copied()
            .find(|language| language.iso_code_639_1() == code)
    }

    /// The scripts this language is written in.
    pub fn alphabets(&self) -> &'static [Alphabet] {
        match self {
            Arabic => &[Alphabet::Arabic],
            Bulgarian | Russian | Ukrainian => &[Alphabet::Cyrillic],
            Chinese => &[Alphabet::Han],
            Greek => &[Alphabet::Greek],
            Hebrew => &[Alphabet::Hebrew],
            Hindi | Marathi => &[Alphabet::Devanagari],
            Japanese => &[Alphabet::Hiragana, Alphabet::Katakana, Alphabet::Han],
            Korean => &[Alphabet::Hangul],
            Thai => &[Alphabet::Thai],
            English | French | German | Italian | Polish | Portuguese | Spanish | Turkish => {
                &[Alphabet::Latin]
            }
            Unknown => &[],
        }
    }

    /// Characters that, within this catalog, occur in this language only.
    /// Their presence in a word is a strong single-language signal.
    pub fn unique_characters(&self) -> Option<&'static str> {
        match self {
            German => Some("ß"),
            Marathi => Some("ळ"),
            Polish => Some("ŁłŃńŚśŹź"),
            Spanish => Some("¿¡"),
            Turkish => Some("İı"),
            Ukrainian => Some("ҐґЄєЇї"),
            _ => None,
        }
    }
}
