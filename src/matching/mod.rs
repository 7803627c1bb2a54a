//! Read classification against a [`KmerIndex`](crate::index::KmerIndex).
//!
//! - [`ModalMatcher`]: picks the reference tag receiving the most k-mer votes
//! - [`calc_identity`]: alignment length and identity for a matched pair
//! - [`classify_batch`]: parallel classification of many reads
//!
//! ## Matching Algorithm
//!
//! 1. Reject the read with `InvalidSequenceError` if it holds a symbol
//!    outside {A,C,G,T}
//! 2. Slide a window of `k` bases across the read; each window's bucket casts
//!    one vote for every tag id it lists
//! 3. The tag with the most votes wins. Ties go to the shortest tag, then to
//!    the lowest tag id, so a tag contained in a longer one still matches
//!    itself
//!
//! A read shorter than `k`, or one whose windows all miss, has no match.
//!
//! ## Example
//!
//! ```
//! use tagmatch::core::reference::ReferenceSet;
//! use tagmatch::index::{IndexConfig, KmerIndex};
//! use tagmatch::matching::ModalMatcher;
//!
//! let refs = ReferenceSet::from_sequences(["ACGTACGT", "AACCGGTT", "AAACCCGGG"]).unwrap();
//! let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
//!
//! let matcher = ModalMatcher::new(&index);
//! let m = matcher.find_match(b"AGCCGGTT").unwrap().unwrap();
//! assert_eq!(m.tag.as_str(), "AACCGGTT");
//!
//! assert!(matcher.find_match(b"AGCCNGTT").is_err());
//! ```

pub mod batch;
pub mod engine;
pub mod identity;

pub use batch::{classify_batch, BatchSummary};
pub use engine::{Classification, MatcherConfig, ModalMatcher, TagMatch, VoteTally};
pub use identity::{calc_identity, levenshtein_distance};
