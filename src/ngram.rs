//! N-gram extraction
//!
//! N-grams are character-based (a surrogate pair is one character), never
//! byte-based. A test model is the set of distinct n-grams of one order
//! present in a cleaned input string.

use ahash::AHashSet;

/// The largest n-gram order the engine scores.
pub(crate) const MAX_NGRAM_LENGTH: usize = 5;

/// An immutable n-gram of 1 to 5 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Ngram {
    value: String,
}

impl Ngram {
    /// # Panics
    /// Lengths outside 1..=5 are a programmer error.
    pub(crate) fn new(value: &str) -> Self {
        let char_count = value.chars().count();
        assert!(
            (1..=MAX_NGRAM_LENGTH).contains(&char_count),
            "ngram length must be in 1..={MAX_NGRAM_LENGTH}, got {char_count} for {value:?}"
        );
        Self {
            value: value.to_string(),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.value
    }

    /// The backoff chain: this n-gram followed by its prefixes obtained by
    /// removing trailing characters, down to length 1.
    pub(crate) fn backoff_chain(&self) -> impl Iterator<Item = &str> {
        let mut ends: Vec<usize> = self.value.char_indices().skip(1).map(|(i, _)| i).collect();
        ends.push(self.value.len());
        ends.into_iter().rev().map(move |end| &self.value[..end])
    }
}

/// The distinct n-grams of one order present in an input string, in
/// first-occurrence order so that summation over them is reproducible.
#[derive(Debug)]
pub(crate) struct TestDataModel {
    ngrams: Vec<Ngram>,
}

impl TestDataModel {
    pub(crate) fn new(text: &str, ngram_length: usize) -> Self {
        assert!(
            (1..=MAX_NGRAM_LENGTH).contains(&ngram_length),
            "ngram length must be in 1..={MAX_NGRAM_LENGTH}, got {ngram_length}"
        );
        let chars: Vec<char> = text.chars().collect();
        let mut seen = AHashSet::new();
        let mut ngrams = Vec::new();
        if chars.len() >= ngram_length {
            for window in chars.windows(ngram_length) {
                let value: String = window.iter().collect();
                if seen.insert(value.clone()) {
                    ngrams.push(Ngram::new(&value));
                }
            }
        }
        Self { ngrams }
    }

    pub(crate) fn ngrams(&self) -> impl Iterator<Item = &Ngram> {
        self.ngrams.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(model: &TestDataModel) -> Vec<&str> {
        model.ngrams().map(|n| n.as_str()).collect()
    }

    #[test]
    fn test_extraction_is_a_set() {
        let model = TestDataModel::new("aabaa", 2);
        assert_eq!(values(&model), vec!["aa", "ab", "ba"]);
    }

    #[test]
    fn test_extraction_shorter_than_order_is_empty() {
        let model = TestDataModel::new("ab", 3);
        assert!(model.is_empty());
    }

    #[test]
    fn test_extraction_is_char_based() {
        let model = TestDataModel::new("日本語", 2);
        assert_eq!(values(&model), vec!["日本", "本語"]);

        // Characters outside the BMP still count as one character each.
        let model = TestDataModel::new("a😀b", 3);
        assert_eq!(values(&model), vec!["a😀b"]);
    }

    #[test]
    fn test_backoff_chain_order() {
        let ngram = Ngram::new("abcde");
        let chain: Vec<&str> = ngram.backoff_chain().collect();
        assert_eq!(chain, vec!["abcde", "abcd", "abc", "ab", "a"]);
    }

    #[test]
    fn test_backoff_chain_of_unigram() {
        let ngram = Ngram::new("a");
        let chain: Vec<&str> = ngram.backoff_chain().collect();
        assert_eq!(chain, vec!["a"]);
    }

    #[test]
    fn test_backoff_chain_is_char_based() {
        let ngram = Ngram::new("日本語");
        let chain: Vec<&str> = ngram.backoff_chain().collect();
        assert_eq!(chain, vec!["日本語", "日本", "日"]);
    }

    #[test]
    #[should_panic(expected = "ngram length")]
    fn test_empty_ngram_is_rejected() {
        Ngram::new("");
    }

    #[test]
    #[should_panic(expected = "ngram length")]
    fn test_oversized_ngram_is_rejected() {
        Ngram::new("abcdef");
    }
}
