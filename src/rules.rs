//! Rule-based classification
//!
//! Script and character evidence alone can decide a language outright or
//! shrink the candidate set before any statistical scoring runs. Both
//! operations tally per-word evidence and apply strict-majority decisions;
//! ties always fall back to `Unknown` or to the unfiltered set.

use crate::alphabet::Alphabet;
use crate::language::Language;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Character classes whose presence in a word disambiguates between
/// languages sharing the Latin script. Entries are consulted in order; the
/// first hit per word wins.
const CHAR_CLASS_LANGUAGES: &[(&str, &[Language])] = &[
    ("Îî", &[Language::French]),
    ("Ññ", &[Language::Spanish]),
    ("Ûû", &[Language::French]),
    ("Ëë", &[Language::French]),
    ("ÈèÙù", &[Language::French]),
    ("Êê", &[Language::French]),
    ("Ôô", &[Language::French]),
    ("Àà", &[Language::French]),
    ("Üü", &[Language::Spanish]),
    ("Çç", &[Language::French]),
    ("Óó", &[Language::Spanish]),
    ("ÁáÍíÚú", &[Language::Spanish]),
    ("Éé", &[Language::French, Language::Spanish]),
];

/// Rule-only classifier and candidate filter over a configured language set.
pub(crate) struct RuleEngine {
    languages: BTreeSet<Language>,
}

impl RuleEngine {
    pub(crate) fn new(languages: BTreeSet<Language>) -> Self {
        Self { languages }
    }

    /// Decides a language from script evidence alone, or `Unknown` when the
    /// evidence is absent, ambiguous, or points outside the configured set.
    pub(crate) fn detect_by_rules(&self, words: &[&str]) -> Language {
        let mut total_counts: BTreeMap<Language, usize> = BTreeMap::new();

        for word in words {
            let mut word_counts: BTreeMap<Language, usize> = BTreeMap::new();
            for ch in word.chars() {
                let mut matched_unique_alphabet = false;
                for (alphabet, &language) in Alphabet::all_supporting_exactly_one_language() {
                    if alphabet.matches_char(ch) {
                        *word_counts.entry(language).or_insert(0) += 1;
                        matched_unique_alphabet = true;
                    }
                }
                if !matched_unique_alphabet
                    && (Alphabet::Latin.matches_char(ch) || Alphabet::Devanagari.matches_char(ch))
                {
                    for &language in Language::all() {
                        if language
                            .unique_characters()
                            .is_some_and(|unique| unique.contains(ch))
                        {
                            *word_counts.entry(language).or_insert(0) += 1;
                        }
                    }
                }
            }

            let word_winner = match word_counts.len() {
                0 => Language::Unknown,
                1 => {
                    let (&language, _) = word_counts.iter().next().unwrap();
                    if self.languages.contains(&language) {
                        language
                    } else {
                        Language::Unknown
                    }
                }
                _ => match strict_maximum(&word_counts) {
                    Some(language) if self.languages.contains(&language) => language,
                    _ => Language::Unknown,
                },
            };
            *total_counts.entry(word_winner).or_insert(0) += 1;
        }

        let unknown_count = total_counts
            .get(&Language::Unknown)
            .copied()
            .unwrap_or(0);
        if (unknown_count as f64) < 0.5 * words.len() as f64 {
            total_counts.remove(&Language::Unknown);
        }

        let decision = match total_counts.len() {
            0 => Language::Unknown,
            1 => *total_counts.keys().next().unwrap(),
            _ => strict_maximum(&total_counts).unwrap_or(Language::Unknown),
        };
        if decision != Language::Unknown {
            debug!("Rule engine decided {:?} from script evidence", decision);
        }
        decision
    }

    /// Narrows the configured languages to those plausible for the words'
    /// dominant script, further restricted by disambiguating characters.
    pub(crate) fn filter_candidates(&self, words: &[&str]) -> Vec<Language> {
        let mut alphabet_counts: BTreeMap<Alphabet, usize> = BTreeMap::new();
        for word in words {
            if let Some(&alphabet) = Alphabet::all().iter().find(|a| a.matches(word)) {
                *alphabet_counts.entry(alphabet).or_insert(0) += 1;
            }
        }

        let filtered: Vec<Language> = match dominant_alphabet(&alphabet_counts) {
            None => self.languages.iter().copied().collect(),
            Some(alphabet) => self
                .languages
                .iter()
                .copied()
                .filter(|language| language.alphabets().contains(&alphabet))
                .collect(),
        };

        let mut language_counts: BTreeMap<Language, usize> = BTreeMap::new();
        for word in words {
            for (characters, languages) in CHAR_CLASS_LANGUAGES {
                if word.chars().any(|ch| characters.contains(ch)) {
                    for &language in *languages {
                        *language_counts.entry(language).or_insert(0) += 1;
                    }
                    break;
                }
            }
        }

        let half = words.len() / 2;
        let qualified: BTreeSet<Language> = language_counts
            .iter()
            .filter(|(_, &count)| count >= half)
            .map(|(&language, _)| language)
            .collect();
        if qualified.is_empty() {
            filtered
        } else {
            let narrowed: Vec<Language> = filtered
                .into_iter()
                .filter(|language| qualified.contains(language))
                .collect();
            debug!("Disambiguating characters narrowed candidates to {:?}", narrowed);
            narrowed
        }
    }
}

/// The key with the strictly largest count, or `None` on a first-place tie.
/// Requires at least two entries.
fn strict_maximum<K: Copy + Ord>(counts: &BTreeMap<K, usize>) -> Option<K> {
    let mut sorted: Vec<(K, usize)> = counts.iter().map(|(&k, &c)| (k, c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    if sorted[0].1 == sorted[1].1 {
        None
    } else {
        Some(sorted[0].0)
    }
}

/// The first alphabet in catalog order holding the maximum tally.
fn dominant_alphabet(counts: &BTreeMap<Alphabet, usize>) -> Option<Alphabet> {
    let mut best: Option<(Alphabet, usize)> = None;
    for (&alphabet, &count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((alphabet, count));
        }
    }
    best.map(|(alphabet, _)| alphabet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(languages: &[Language]) -> RuleEngine {
        RuleEngine::new(languages.iter().copied().collect())
    }

    #[test]
    fn test_unique_script_short_circuits() {
        let arabic = engine(&[Language::Arabic, Language::English]);
        assert_eq!(arabic.detect_by_rules(&["مرحبا", "بالعالم"]), Language::Arabic);

        let greek = engine(&[Language::Greek, Language::English]);
        assert_eq!(greek.detect_by_rules(&["ελληνικά"]), Language::Greek);

        let korean = engine(&[Language::Korean]);
        assert_eq!(korean.detect_by_rules(&["한국어입니다"]), Language::Korean);
    }

    #[test]
    fn test_unconfigured_language_stays_unknown() {
        let engine = engine(&[Language::English]);
        assert_eq!(engine.detect_by_rules(&["مرحبا"]), Language::Unknown);
    }

    #[test]
    fn test_latin_words_without_unique_characters_stay_unknown() {
        let engine = engine(&[Language::English, Language::German]);
        assert_eq!(engine.detect_by_rules(&["languages", "are", "awesome"]), Language::Unknown);
    }

    #[test]
    fn test_unique_character_decides_language() {
        let german = engine(&[Language::German, Language::English]);
        assert_eq!(german.detect_by_rules(&["straße"]), Language::German);

        let polish = engine(&[Language::Polish, Language::English]);
        assert_eq!(polish.detect_by_rules(&["jabłko"]), Language::Polish);
    }

    #[test]
    fn test_mixed_script_majority_wins() {
        let korean = engine(&[Language::Korean, Language::English]);
        // Two Hangul words against one Latin word without unique characters:
        // the Unknown tally stays below half the words and is dropped.
        assert_eq!(
            korean.detect_by_rules(&["한국어", "입니다", "hello"]),
            Language::Korean
        );
        // One against one keeps Unknown in the tally and ties the maximum.
        assert_eq!(korean.detect_by_rules(&["한국어", "hello"]), Language::Unknown);
    }

    #[test]
    fn test_filter_restricts_to_dominant_script() {
        let engine = engine(&[
            Language::English,
            Language::Russian,
            Language::Ukrainian,
            Language::Greek,
        ]);
        let candidates = engine.filter_candidates(&["привет", "мир"]);
        assert_eq!(candidates, vec![Language::Russian, Language::Ukrainian]);
    }

    #[test]
    fn test_filter_without_script_evidence_returns_all() {
        let engine = engine(&[Language::English, Language::Russian]);
        // No alphabet matches every character of the word.
        let candidates = engine.filter_candidates(&["hello\u{4e16}\u{0440}"]);
        assert_eq!(candidates, vec![Language::English, Language::Russian]);
    }

    #[test]
    fn test_disambiguating_characters_narrow_candidates() {
        let engine = engine(&[Language::English, Language::French, Language::Spanish]);
        assert_eq!(engine.filter_candidates(&["señor"]), vec![Language::Spanish]);
        assert_eq!(engine.filter_candidates(&["garçon"]), vec![Language::French]);
        // É maps to both French and Spanish.
        assert_eq!(
            engine.filter_candidates(&["été"]),
            vec![Language::French, Language::Spanish]
        );
    }

    #[test]
    fn test_first_disambiguation_entry_wins_per_word() {
        // "épître" contains both î and é, but "Îî" precedes "Éé" in the
        // table, so only French is incremented and Spanish never qualifies.
        let engine = engine(&[Language::English, Language::French, Language::Spanish]);
        assert_eq!(engine.filter_candidates(&["épître"]), vec![Language::French]);
    }

    #[test]
    fn test_disambiguation_needs_half_the_words() {
        let engine = engine(&[Language::English, Language::French, Language::Spanish]);
        // One marked word out of four is below half, so the script filter
        // alone decides.
        let candidates = engine.filter_candidates(&["señor", "plain", "words", "here"]);
        assert_eq!(
            candidates,
            vec![Language::English, Language::French, Language::Spanish]
        );
        // Two out of four reaches half.
        let candidates = engine.filter_candidates(&["señor", "niño", "words", "here"]);
        assert_eq!(candidates, vec![Language::Spanish]);
    }
}
