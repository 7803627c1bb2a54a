use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::matching::engine::{Classification, ModalMatcher, VoteTally};

/// Counts over one or more classified batches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub reads: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Reads holding a symbol outside {A,C,G,T}
    pub rejected: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_results(results: &[Classification<'_>]) -> Self {
        let mut summary = Self::default();
        summary.add(results);
        summary
    }

    /// Fold another batch into the running counts
    pub fn add(&mut self, results: &[Classification<'_>]) {
        for result in results {
            match result {
                Ok(Some(_)) => self.matched += 1,
                Ok(None) => self.unmatched += 1,
                Err(_) => self.rejected += 1,
            }
        }
        self.reads += results.len();
    }

    /// Fraction of reads that matched a tag
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.reads == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)] // read counts are far below 2^52
        let rate = self.matched as f64 / self.reads as f64;
        rate
    }
}

/// Classify every read in parallel on the current rayon pool.
///
/// Output order follows input order. Each worker keeps its own
/// [`VoteTally`]; the index is shared read-only. A read with a symbol outside
/// {A,C,G,T} gets its own `Err` and does not affect the others.
pub fn classify_batch<'a, S>(matcher: &ModalMatcher<'a>, reads: &[S]) -> Vec<Classification<'a>>
where
    S: AsRef<[u8]> + Sync,
{
    let tags = matcher.index().references().len();
    let results: Vec<Classification<'a>> = reads
        .par_iter()
        .map_init(
            || VoteTally::with_capacity(tags),
            |tally, read| matcher.find_match_with(read.as_ref(), tally),
        )
        .collect();

    debug!(
        "Classified {} reads on {} threads",
        reads.len(),
        rayon::current_num_threads()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::ReferenceSet;
    use crate::index::{IndexConfig, KmerIndex};

    #[test]
    fn test_batch_matches_sequential() {
        let refs = ReferenceSet::from_sequences(["ACGTACGT", "AACCGGTT", "AAACCCGGG"]).unwrap();
        let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
        let matcher = ModalMatcher::new(&index);

        let reads = ["AAACCGGG", "GAGAGAGA", "AGCCGGTT", "ACG", "ACGTTCGT", "ACGTNCGT"];
        let batch = classify_batch(&matcher, &reads);
        let sequential: Vec<_> = reads
            .iter()
            .map(|r| matcher.find_match(r.as_bytes()))
            .collect();

        assert_eq!(batch, sequential);
        assert!(batch[5].is_err());

        let summary = BatchSummary::from_results(&batch);
        assert_eq!(summary.reads, 6);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.unmatched, 2);
        assert_eq!(summary.rejected, 1);
        assert!((summary.match_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_summary_accumulates_batches() {
        let refs = ReferenceSet::from_sequences(["ACGTACGT", "AACCGGTT"]).unwrap();
        let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
        let matcher = ModalMatcher::new(&index);

        let mut summary = BatchSummary::default();
        summary.add(&classify_batch(&matcher, &["ACGTACGT", "GAGAGAGA"]));
        summary.add(&classify_batch(&matcher, &["AACCGGTT", "AACXGGTT"]));

        assert_eq!(
            summary,
            BatchSummary {
                reads: 4,
                matched: 2,
                unmatched: 1,
                rejected: 1,
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        let refs = ReferenceSet::from_sequences(["ACGTACGT"]).unwrap();
        let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
        let matcher = ModalMatcher::new(&index);

        let reads: Vec<Vec<u8>> = Vec::new();
        assert!(classify_batch(&matcher, &reads).is_empty());
        assert_eq!(BatchSummary::from_results(&[]).match_rate(), 0.0);
    }
}
