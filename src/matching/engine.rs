use std::cmp::Reverse;

use serde::Serialize;

use crate::core::error::InvalidSequenceError;
use crate::core::kmer::KmerIter;
use crate::core::reference::ReferenceSet;
use crate::core::sequence::{validate_nucleotides, Tag};
use crate::core::types::{Confidence, MatchType, TagId};
use crate::index::store::KmerIndex;

/// Default minimum number of votes for a match to be reported
pub const DEFAULT_MIN_VOTES: u32 = 1;

/// Outcome for one read: rejected, unmatched or matched
pub type Classification<'a> = Result<Option<TagMatch<'a>>, InvalidSequenceError>;

/// Configuration for the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Winners with fewer votes than this are reported as no match
    pub min_votes: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_votes: DEFAULT_MIN_VOTES,
        }
    }
}

/// A reference tag selected for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMatch<'a> {
    pub tag_id: TagId,

    /// Name of the matched tag
    pub name: &'a str,

    /// The matched tag
    pub tag: &'a Tag,

    /// Query windows whose word maps to this tag
    pub votes: u32,

    /// Query windows looked up
    pub windows: u32,
}

impl TagMatch<'_> {
    /// Fraction of query windows that voted for this tag
    #[must_use]
    pub fn vote_fraction(&self) -> f64 {
        if self.windows == 0 {
            return 0.0;
        }
        f64::from(self.votes) / f64::from(self.windows)
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        Confidence::from_vote_fraction(self.vote_fraction())
    }
}

/// Per-query vote counts, reusable across queries.
///
/// Only the touched entries are reset between queries, so reuse costs nothing
/// proportional to the reference set size.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    votes: Vec<u32>,
    touched: Vec<TagId>,
}

impl VoteTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(tags: usize) -> Self {
        Self {
            votes: vec![0; tags],
            touched: Vec::new(),
        }
    }

    fn prepare(&mut self, tags: usize) {
        if self.votes.len() < tags {
            self.votes.resize(tags, 0);
        }
    }

    #[inline]
    fn add(&mut self, id: TagId) {
        let count = &mut self.votes[id.index()];
        if *count == 0 {
            self.touched.push(id);
        }
        *count += 1;
    }

    /// Highest vote count; ties go to the shortest tag, then the lowest id
    fn winner(&self, references: &ReferenceSet) -> Option<(TagId, u32)> {
        self.touched
            .iter()
            .map(|&id| (id, self.votes[id.index()]))
            .min_by_key(|&(id, votes)| rank_key(references, id, votes))
    }

    /// Every touched tag in the same order [`winner`](Self::winner) uses
    fn ranked(&self, references: &ReferenceSet) -> Vec<(TagId, u32)> {
        let mut ranked: Vec<(TagId, u32)> = self
            .touched
            .iter()
            .map(|&id| (id, self.votes[id.index()]))
            .collect();
        ranked.sort_unstable_by_key(|&(id, votes)| rank_key(references, id, votes));
        ranked
    }

    fn clear(&mut self) {
        for id in self.touched.drain(..) {
            self.votes[id.index()] = 0;
        }
    }
}

/// Sort key putting the preferred candidate first: more votes, then a shorter
/// tag, then a lower id. A tag that is a substring of another collects the
/// same votes from its own sequence, so the shorter tag has to win that tie.
fn rank_key(references: &ReferenceSet, id: TagId, votes: u32) -> (Reverse<u32>, usize, TagId) {
    let len = references.tag(id).map_or(usize::MAX, Tag::len);
    (Reverse(votes), len, id)
}

/// Classifies reads against a [`KmerIndex`] by modal k-mer vote.
///
/// Every k-window of the query looks up its bucket and casts one vote per tag
/// id found there; the tag with the most votes is the match. When the index
/// was built bidirectionally it already holds both strands, so a window and
/// its reverse complement resolve to the same bucket and each window is looked
/// up once.
pub struct ModalMatcher<'a> {
    index: &'a KmerIndex,
    config: MatcherConfig,
}

impl<'a> ModalMatcher<'a> {
    /// Create a new matcher with default configuration
    #[must_use]
    pub fn new(index: &'a KmerIndex) -> Self {
        Self {
            index,
            config: MatcherConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(index: &'a KmerIndex, config: MatcherConfig) -> Self {
        Self { index, config }
    }

    #[must_use]
    pub fn index(&self) -> &'a KmerIndex {
        self.index
    }

    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Best tag for `query`, or `None` if the query is shorter than `k` or no
    /// window hit the index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` if the query holds a symbol outside
    /// {A,C,G,T}. Nothing is voted for a rejected query.
    pub fn find_match(&self, query: &[u8]) -> Classification<'a> {
        let mut tally = VoteTally::with_capacity(self.index.references().len());
        self.find_match_with(query, &mut tally)
    }

    /// Same as [`find_match`](Self::find_match), reusing a caller-owned tally
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` if the query holds a symbol outside
    /// {A,C,G,T}.
    pub fn find_match_with(&self, query: &[u8], tally: &mut VoteTally) -> Classification<'a> {
        let Some(windows) = self.tally_votes(query, tally)? else {
            return Ok(None);
        };
        let references = self.index.references();
        let winner = match self.index.config().match_type {
            MatchType::ModalKmer => tally.winner(references),
        };
        tally.clear();

        Ok(winner
            .filter(|&(_, votes)| votes >= self.config.min_votes)
            .and_then(|(tag_id, votes)| self.to_match(tag_id, votes, windows)))
    }

    /// Up to `limit` tags hit by `query`, best first
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` if the query holds a symbol outside
    /// {A,C,G,T}.
    pub fn find_candidates(
        &self,
        query: &[u8],
        limit: usize,
    ) -> Result<Vec<TagMatch<'a>>, InvalidSequenceError> {
        let mut tally = VoteTally::with_capacity(self.index.references().len());
        let Some(windows) = self.tally_votes(query, &mut tally)? else {
            return Ok(Vec::new());
        };
        let ranked = tally.ranked(self.index.references());

        Ok(ranked
            .into_iter()
            .filter(|&(_, votes)| votes >= self.config.min_votes)
            .take(limit)
            .filter_map(|(tag_id, votes)| self.to_match(tag_id, votes, windows))
            .collect())
    }

    /// Cast the votes for every window; `None` if the query is shorter than k
    fn tally_votes(
        &self,
        query: &[u8],
        tally: &mut VoteTally,
    ) -> Result<Option<u32>, InvalidSequenceError> {
        validate_nucleotides(query)?;
        let k = self.index.word_length();
        if query.len() < k {
            return Ok(None);
        }
        tally.prepare(self.index.references().len());

        let mut windows = 0u32;
        for kmer in KmerIter::new(query, k) {
            windows = windows.saturating_add(1);
            for &id in self.index.lookup_key(kmer.forward) {
                tally.add(id);
            }
        }
        Ok(Some(windows))
    }

    fn to_match(&self, tag_id: TagId, votes: u32, windows: u32) -> Option<TagMatch<'a>> {
        let entry = self.index.references().get(tag_id)?;
        Some(TagMatch {
            tag_id,
            name: &entry.name,
            tag: &entry.tag,
            votes,
            windows,
        })
    }
}
