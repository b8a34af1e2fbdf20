//! Key corpus generation
//!
//! Produces the fixed universe of keys the workers draw from. Every key is
//! 100 padding bytes followed by a decimal index, so keys are distinct,
//! deterministic, and share a long common prefix.

use bytes::Bytes;

/// Number of `x` padding bytes prefixed to every key
pub const KEY_PADDING: usize = 100;

/// Fixed, immutable universe of keys
///
/// Built once by the orchestrator before workers start; shared read-only
/// by every worker for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct Corpus {
    keys: Vec<Bytes>,
}

impl Corpus {
    /// Generate `demand_size` distinct keys.
    ///
    /// Key `i` is `"x" * 100` followed by the decimal rendering of `i`.
    /// The sequence is identical across runs and platforms for the same
    /// `demand_size`.
    pub fn generate(demand_size: usize) -> Self {
        let pad = "x".repeat(KEY_PADDING);
        let mut keys = Vec::with_capacity(demand_size);
        for i in 0..demand_size {
            keys.push(Bytes::from(format!("{}{}", pad, i)));
        }
        Self { keys }
    }

    /// Number of keys in the corpus
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the corpus holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at `index` (panics if out of range)
    #[inline]
    pub fn key(&self, index: usize) -> &Bytes {
        &self.keys[index]
    }

    /// Iterate over all keys in index order
    pub fn iter(&self) -> impl Iterator<Item = &Bytes> {
        self.keys.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_corpus_length() {
        let corpus = Corpus::generate(1000);
        assert_eq!(corpus.len(), 1000);
        assert!(!corpus.is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::generate(0);
        assert_eq!(corpus.len(), 0);
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_key_format() {
        let corpus = Corpus::generate(10);
        let key = corpus.key(7);
        assert_eq!(key.len(), KEY_PADDING + 1);
        assert!(key.starts_with(b"xxxx"));
        assert!(key.ends_with(b"7"));

        let expected: Bytes = Bytes::from(format!("{}{}", "x".repeat(100), 7));
        assert_eq!(key, &expected);
    }

    #[test]
    fn test_keys_distinct() {
        let corpus = Corpus::generate(5000);
        let unique: HashSet<&Bytes> = corpus.iter().collect();
        assert_eq!(unique.len(), 5000);
    }

    #[test]
    fn test_deterministic_across_builds() {
        let a = Corpus::generate(256);
        let b = Corpus::generate(256);
        for i in 0..256 {
            assert_eq!(a.key(i), b.key(i));
        }
    }

    #[test]
    fn test_multi_digit_indices() {
        let corpus = Corpus::generate(12_000);
        assert!(corpus.key(0).ends_with(b"x0"));
        assert!(corpus.key(11_999).ends_with(b"11999"));
        assert_eq!(corpus.key(11_999).len(), KEY_PADDING + 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: generation is deterministic, keys are distinct, and
        /// every key is the full padding prefix plus its decimal index.
        #[test]
        fn prop_corpus_well_formed(demand in 0usize..512) {
            let a = Corpus::generate(demand);
            let b = Corpus::generate(demand);
            prop_assert_eq!(a.len(), demand);

            let pad = "x".repeat(KEY_PADDING);
            let mut seen = HashSet::new();
            for i in 0..demand {
                prop_assert_eq!(a.key(i), b.key(i));
                prop_assert!(a.key(i).starts_with(pad.as_bytes()));
                prop_assert!(a.key(i).ends_with(i.to_string().as_bytes()));
                prop_assert_eq!(a.key(i).len(), KEY_PADDING + i.to_string().len());
                prop_assert!(seen.insert(a.key(i).clone()));
            }
        }
    }
}
