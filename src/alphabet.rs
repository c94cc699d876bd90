//! Script classification
//!
//! Each alphabet is a Unicode script class with predicates over single
//! characters and whole strings. The rule engine relies on the derived map
//! of alphabets that belong to exactly one catalog language for its
//! short-circuit decisions.

use crate::language::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// A script class a word or character can be tested against.
///
/// The declaration order is the catalog's declared order; the candidate
/// filter scans alphabets in this order when classifying a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Alphabet {
    Arabic,
    Cyrillic,
    Devanagari,
    Greek,
    Han,
    Hangul,
    Hebrew,
    Hiragana,
    Katakana,
    Latin,
    Thai,
}

const ALL: [Alphabet; 11] = [
    Alphabet::Arabic,
    Alphabet::Cyrillic,
    Alphabet::Devanagari,
    Alphabet::Greek,
    Alphabet::Han,
    Alphabet::Hangul,
    Alphabet::Hebrew,
    Alphabet::Hiragana,
    Alphabet::Katakana,
    Alphabet::Latin,
    Alphabet::Thai,
];

fn script_pattern(script: &str) -> Regex {
    // The script names below are all valid Unicode script classes, so the
    // pattern always compiles.
    Regex::new(&format!(r"^\p{{{script}}}+$")).expect("invalid script pattern")
}

macro_rules! script_regex {
    ($name:ident, $script:literal) => {
        static $name: Lazy<Regex> = Lazy::new(|| script_pattern($script));
    };
}

script_regex!(ARABIC, "Arabic");
script_regex!(CYRILLIC, "Cyrillic");
script_regex!(DEVANAGARI, "Devanagari");
script_regex!(GREEK, "Greek");
script_regex!(HAN, "Han");
script_regex!(HANGUL, "Hangul");
script_regex!(HEBREW, "Hebrew");
script_regex!(HIRAGANA, "Hiragana");
script_regex!(KATAKANA, "Katakana");
script_regex!(LATIN, "Latin");
script_regex!(THAI, "Thai");

impl Alphabet {
    /// All alphabets in declared order.
    pub fn all() -> &'static [Alphabet] {
        &ALL
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Alphabet::Arabic => &ARABIC,
            Alphabet::Cyrillic => &CYRILLIC,
            Alphabet::Devanagari => &DEVANAGARI,
            Alphabet::Greek => &GREEK,
            Alphabet::Han => &HAN,
            Alphabet::Hangul => &HANGUL,
            Alphabet::Hebrew => &HEBREW,
            Alphabet::Hiragana => &HIRAGANA,
            Alphabet::Katakana => &KATAKANA,
            Alphabet::Latin => &LATIN,
            Alphabet::Thai => &THAI,
        }
    }

    /// Whether every character of `text` belongs to this script.
    /// Empty strings match no script.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern().is_match(text)
    }

    /// Whether a single character belongs to this script.
    pub fn matches_char(&self, ch: char) -> bool {
        self.pattern().is_match(ch.encode_utf8(&mut [0u8; 4]))
    }

    /// Alphabets used by exactly one language of the catalog, mapped to that
    /// language. Iteration follows the alphabet catalog order, so tallies
    /// built from this map are reproducible.
    pub fn all_supporting_exactly_one_language() -> &'static BTreeMap<Alphabet, Language> {
        static MAP: Lazy<BTreeMap<Alphabet, Language>> = Lazy::new(|| {
            let mut users: BTreeMap<Alphabet, Vec<Language>> = BTreeMap::new();
            for &language in Language::all() {
                for &alphabet in language.alphabets() {
                    users.entry(alphabet).or_default().push(language);
                }
            }
            users
                .into_iter()
                .filter(|(_, languages)| languages.len() == 1)
                .map(|(alphabet, languages)| (alphabet, languages[0]))
                .collect()
        });
        &MAP
    }
}
