use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::ConfigurationError;
use crate::core::kmer::{KmerIter, MAX_WORD_LENGTH};
use crate::core::reference::ReferenceSet;
use crate::core::types::{MatchType, TagId};
use crate::index::store::{Bucket, KmerIndex};

/// Default k-mer length
pub const DEFAULT_WORD_LENGTH: usize = 16;

/// Default ceiling on how many times a word may occur before it is dropped
pub const DEFAULT_MAX_WORD_COPIES: usize = 1000;

/// Parameters for building a [`KmerIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Length `k` of each indexed word
    pub word_length: usize,

    /// Words occurring more often than this across the reference set are
    /// dropped as uninformative
    pub max_word_copies: usize,

    pub match_type: MatchType,

    /// Also index the reverse complement of every word
    pub search_bidirectional: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            word_length: DEFAULT_WORD_LENGTH,
            max_word_copies: DEFAULT_MAX_WORD_COPIES,
            match_type: MatchType::default(),
            search_bidirectional: false,
        }
    }
}

impl IndexConfig {
    #[must_use]
    pub fn with_word_length(mut self, word_length: usize) -> Self {
        self.word_length = word_length;
        self
    }

    #[must_use]
    pub fn with_max_word_copies(mut self, max_word_copies: usize) -> Self {
        self.max_word_copies = max_word_copies;
        self
    }

    #[must_use]
    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    #[must_use]
    pub fn with_search_bidirectional(mut self, search_bidirectional: bool) -> Self {
        self.search_bidirectional = search_bidirectional;
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigurationError` if the word length is outside
    /// `1..=MAX_WORD_LENGTH` or `max_word_copies` is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(1..=MAX_WORD_LENGTH).contains(&self.word_length) {
            return Err(ConfigurationError::InvalidWordLength(self.word_length));
        }
        if self.max_word_copies == 0 {
            return Err(ConfigurationError::InvalidMaxWordCopies(
                self.max_word_copies,
            ));
        }
        Ok(())
    }
}

/// Summary of a build, kept alongside the index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Tags that contributed at least one window
    pub tags_indexed: usize,

    /// Tags shorter than the word length
    pub tags_too_short: usize,

    /// Distinct words kept in the index
    pub distinct_words: usize,

    /// Distinct words dropped for exceeding `max_word_copies`
    pub dropped_words: usize,

    /// Total tag ids stored across all buckets
    pub arena_len: usize,
}

impl KmerIndex {
    /// Build an index over every tag of `references`.
    ///
    /// Each tag of length `L >= k` contributes its `L - k + 1` windows (and
    /// their reverse complements when bidirectional). A word seen more than
    /// `max_word_copies` times is dropped; otherwise its bucket lists each
    /// tag id containing it once, in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an invalid config, an empty reference
    /// set, or more bucket entries than a `u32` offset can address.
    pub fn build(
        references: ReferenceSet,
        config: &IndexConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if references.is_empty() {
            return Err(ConfigurationError::EmptyReferenceSet);
        }

        let k = config.word_length;
        let mut stats = IndexStats::default();

        // One (key, id) pair per window occurrence
        let mut pairs: Vec<(u64, TagId)> = Vec::new();
        for (id, entry) in references.iter() {
            if entry.tag.len() < k {
                debug!(
                    "Tag '{}' ({} bp) is shorter than k={}, skipping",
                    entry.name,
                    entry.tag.len(),
                    k
                );
                stats.tags_too_short += 1;
                continue;
            }
            stats.tags_indexed += 1;

            for kmer in KmerIter::new(entry.tag.as_bytes(), k) {
                pairs.push((kmer.forward, id));
                if config.search_bidirectional {
                    pairs.push((kmer.reverse, id));
                }
            }
        }
        pairs.sort_unstable();

        let mut buckets: FxHashMap<u64, Bucket> = FxHashMap::default();
        let mut arena: Vec<TagId> = Vec::new();

        let mut start = 0;
        while start < pairs.len() {
            let key = pairs[start].0;
            let end = start
                + pairs[start..]
                    .iter()
                    .take_while(|(other, _)| *other == key)
                    .count();

            // Occurrences count every window, repeats within a tag included
            if end - start > config.max_word_copies {
                stats.dropped_words += 1;
            } else {
                let offset = arena.len();
                for &(_, id) in &pairs[start..end] {
                    if arena.len() == offset || arena.last() != Some(&id) {
                        arena.push(id);
                    }
                }
                let bucket = Bucket::new(offset, arena.len() - offset)
                    .ok_or(ConfigurationError::IndexCapacityExceeded(arena.len()))?;
                buckets.insert(key, bucket);
            }

            start = end;
        }

        arena.shrink_to_fit();
        stats.distinct_words = buckets.len();
        stats.arena_len = arena.len();

        info!(
            "Indexed {} tags (k={}, bidirectional={}): {} words kept, {} dropped, {} skipped as too short",
            stats.tags_indexed,
            k,
            config.search_bidirectional,
            stats.distinct_words,
            stats.dropped_words,
            stats.tags_too_short
        );

        Ok(Self {
            config: *config,
            references,
            buckets,
            arena,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::Tag;

    fn references(seqs: &[&str]) -> ReferenceSet {
        ReferenceSet::from_sequences(seqs.iter().copied()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.word_length, 16);
        assert_eq!(config.max_word_copies, 1000);
        assert_eq!(config.match_type, MatchType::ModalKmer);
        assert!(!config.search_bidirectional);
    }

    #[test]
    fn test_invalid_word_length() {
        let refs = references(&["ACGTACGT"]);
        for k in [0, 33] {
            let config = IndexConfig::default().with_word_length(k);
            assert_eq!(
                KmerIndex::build(refs.clone(), &config).unwrap_err(),
                ConfigurationError::InvalidWordLength(k)
            );
        }
    }

    #[test]
    fn test_zero_max_word_copies() {
        let config = IndexConfig::default()
            .with_word_length(4)
            .with_max_word_copies(0);
        assert_eq!(
            KmerIndex::build(references(&["ACGTACGT"]), &config).unwrap_err(),
            ConfigurationError::InvalidMaxWordCopies(0)
        );
    }

    #[test]
    fn test_empty_reference_set() {
        let config = IndexConfig::default().with_word_length(4);
        assert_eq!(
            KmerIndex::build(ReferenceSet::new(), &config).unwrap_err(),
            ConfigurationError::EmptyReferenceSet
        );
    }

    #[test]
    fn test_buckets_hold_each_tag_once() {
        let config = IndexConfig::default().with_word_length(4);
        // ACGT occurs twice in the first tag
        let index = KmerIndex::build(references(&["ACGTACGT", "TTACGTTT"]), &config).unwrap();

        assert_eq!(index.lookup(b"ACGT"), &[TagId(0), TagId(1)]);
        assert_eq!(index.lookup(b"CGTA"), &[TagId(0)]);
        assert!(index.lookup(b"GGGG").is_empty());
    }

    #[test]
    fn test_ceiling_counts_occurrences() {
        let config = IndexConfig::default()
            .with_word_length(4)
            .with_max_word_copies(2);
        // AAAA: 3 windows in tag 0, 1 in tag 1
        let index = KmerIndex::build(references(&["AAAAAA", "CAAAAC"]), &config).unwrap();

        assert!(index.lookup(b"AAAA").is_empty());
        assert_eq!(index.lookup(b"CAAA"), &[TagId(1)]);
        assert_eq!(index.stats().dropped_words, 1);
    }

    #[test]
    fn test_short_tags_contribute_nothing() {
        let config = IndexConfig::default().with_word_length(6);
        let index = KmerIndex::build(references(&["ACG", "ACGTACGT"]), &config).unwrap();

        let stats = index.stats();
        assert_eq!(stats.tags_indexed, 1);
        assert_eq!(stats.tags_too_short, 1);
        assert_eq!(index.references().len(), 2);
        assert_eq!(index.lookup(b"ACGTAC"), &[TagId(1)]);
    }

    #[test]
    fn test_bidirectional_indexes_reverse_complement() {
        let refs = references(&["AACCGGTTA"]);
        let forward = KmerIndex::build(refs.clone(), &IndexConfig::default().with_word_length(5)).unwrap();
        let both = KmerIndex::build(
            refs,
            &IndexConfig::default()
                .with_word_length(5)
                .with_search_bidirectional(true),
        )
        .unwrap();

        // TAACC is the reverse complement of GGTTA
        assert!(forward.lookup(b"TAACC").is_empty());
        assert_eq!(both.lookup(b"TAACC"), &[TagId(0)]);
        assert_eq!(both.lookup(b"GGTTA"), &[TagId(0)]);
    }

    #[test]
    fn test_lookup_wrong_length_or_symbol() {
        let config = IndexConfig::default().with_word_length(4);
        let index = KmerIndex::build(references(&["ACGTACGT"]), &config).unwrap();
        assert!(index.lookup(b"ACG").is_empty());
        assert!(index.lookup(b"ACGTA").is_empty());
        assert!(index.lookup(b"ACNT").is_empty());
    }

    #[test]
    fn test_duplicate_tags_share_an_id() {
        let mut refs = ReferenceSet::new();
        refs.insert("a", Tag::new("ACGTACGT").unwrap());
        refs.insert("b", Tag::new("ACGTACGT").unwrap());
        let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
        assert_eq!(index.lookup(b"GTAC"), &[TagId(0)]);
    }
}
