//! Log-probability scoring
//!
//! Each test n-gram contributes the natural log of the frequency found at
//! the longest prefix of its backoff chain with a non-zero training
//! frequency; n-grams with no hit anywhere in the chain contribute nothing.

use crate::language::Language;
use crate::model::ModelStore;
use crate::ngram::TestDataModel;
use std::collections::BTreeMap;

/// The summed log-probability of `test_model` under `language`'s training
/// models. Non-positive by construction (frequencies lie in (0, 1]).
pub(crate) fn score_language(
    store: &ModelStore,
    language: Language,
    test_model: &TestDataModel,
) -> f64 {
    let mut sum = 0.0;
    for ngram in test_model.ngrams() {
        for prefix in ngram.backoff_chain() {
            let frequency = store.relative_frequency(language, prefix);
            if frequency > 0.0 {
                sum += frequency.ln();
                break;
            }
        }
    }
    sum
}

/// Scores every candidate and keeps only strictly negative scores; a zero
/// score means no n-gram found any evidence at all.
pub(crate) fn language_probabilities(
    store: &ModelStore,
    test_model: &TestDataModel,
    candidates: &[Language],
) -> BTreeMap<Language, f64> {
    let mut probabilities = BTreeMap::new();
    for &language in candidates {
        let score = score_language(store, language, test_model);
        if score < 0.0 {
            probabilities.insert(language, score);
        }
    }
    probabilities
}

/// How many unigrams of the test model have a non-zero training frequency
/// for `language`.
pub(crate) fn count_unigram_hits(
    store: &ModelStore,
    language: Language,
    test_model: &TestDataModel,
) -> usize {
    test_model
        .ngrams()
        .filter(|ngram| store.relative_frequency(language, ngram.as_str()) > 0.0)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DirectoryModelSource, ModelStore, NgramOrder};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn assert_approx_eq(a: f64, b: f64) {
        assert!(
            (a - b).abs() < 1e-12,
            "values not approximately equal: {a} != {b}"
        );
    }

    fn store_with_english_models(dir: &TempDir) -> ModelStore {
        let root = dir.path().join("language-models").join("en");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join(NgramOrder::Unigram.file_name()), r#"{"a": "1/4"}"#).unwrap();
        std::fs::write(root.join(NgramOrder::Bigram.file_name()), r#"{"ab": "1/2"}"#).unwrap();
        std::fs::write(root.join(NgramOrder::Trigram.file_name()), r#"{"xyz": "1/8"}"#).unwrap();
        std::fs::write(root.join(NgramOrder::Quadrigram.file_name()), "{}").unwrap();
        std::fs::write(root.join(NgramOrder::Fivegram.file_name()), "{}").unwrap();

        let languages = BTreeSet::from([Language::English]);
        ModelStore::new(Arc::new(DirectoryModelSource::new(dir.path())), &languages)
    }

    #[test]
    fn test_longest_backoff_hit_wins() {
        let dir = TempDir::new().unwrap();
        let store = store_with_english_models(&dir);

        // "abc" misses the trigram table but hits the bigram "ab"; the
        // unigram "a" must not be consulted once the bigram matched.
        let model = TestDataModel::new("abc", 3);
        assert_approx_eq(
            score_language(&store, Language::English, &model),
            (0.5f64).ln(),
        );
    }

    #[test]
    fn test_full_ngram_hit_shadows_prefixes() {
        let dir = TempDir::new().unwrap();
        let store = store_with_english_models(&dir);

        let model = TestDataModel::new("xyz", 3);
        assert_approx_eq(
            score_language(&store, Language::English, &model),
            (0.125f64).ln(),
        );
    }

    #[test]
    fn test_ngram_without_any_hit_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_with_english_models(&dir);

        let model = TestDataModel::new("qqq", 3);
        assert_eq!(score_language(&store, Language::English, &model), 0.0);
    }

    #[test]
    fn test_probabilities_drop_zero_scores() {
        let dir = TempDir::new().unwrap();
        let store = store_with_english_models(&dir);

        let hit = TestDataModel::new("ab", 2);
        let probabilities = language_probabilities(&store, &hit, &[Language::English]);
        assert_approx_eq(probabilities[&Language::English], (0.5f64).ln());

        let miss = TestDataModel::new("qq", 2);
        let probabilities = language_probabilities(&store, &miss, &[Language::English]);
        assert!(probabilities.is_empty());
    }

    #[test]
    fn test_unigram_hit_count() {
        let dir = TempDir::new().unwrap();
        let store = store_with_english_models(&dir);

        let model = TestDataModel::new("aqa", 1);
        assert_eq!(count_unigram_hits(&store, Language::English, &model), 1);
    }
}
