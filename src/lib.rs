//! # tagmatch
//!
//! A library for classifying short nucleotide reads against a set of
//! reference tags.
//!
//! High-throughput sequencing produces far more reads than a full aligner can
//! handle cheaply, yet most reads only need to be assigned to one of a known
//! set of short reference tags. `tagmatch` does this with a k-mer word index:
//! every window of a read votes for the tags containing it, and the tag with
//! the most votes wins. A matched pair can then be scored exactly with local
//! alignment.
//!
//! ## Features
//!
//! - **K-mer word index**: 2-bit packed words, optional reverse-complement indexing
//! - **Repeat filtering**: words occurring too often are dropped as uninformative
//! - **Modal-vote matching**: deterministic, shortest tag then lowest id wins ties
//! - **Smith-Waterman alignment**: score, offsets and rendered alignment
//! - **Edit distance**: Levenshtein distance between two sequences
//! - **Persistence**: build an index once, save it, reload it
//!
//! ## Example
//!
//! ```rust
//! use tagmatch::{IndexConfig, KmerIndex, ModalMatcher, ReferenceSet};
//!
//! let refs = ReferenceSet::from_sequences(["ACGTACGT", "AACCGGTT", "AAACCCGGG"]).unwrap();
//! let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
//!
//! let matcher = ModalMatcher::new(&index);
//! if let Ok(Some(m)) = matcher.find_match(b"AAACCGGG") {
//!     println!("{}: {} votes", m.tag, m.votes);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Tags, reference sets, k-mer encoding and errors
//! - [`index`]: K-mer index construction and persistence
//! - [`matching`]: Modal-vote matcher, identity and batch classification
//! - [`align`]: Scoring schemes, Smith-Waterman and edit distance
//! - [`parsing`]: FASTA/FASTQ readers
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod cli;
pub mod core;
pub mod index;
pub mod matching;
pub mod parsing;

// Re-export commonly used types for convenience
pub use align::{levenshtein_distance, AlignmentResult, ScoringScheme, SmithWaterman};
pub use core::error::{ConfigurationError, InvalidSequenceError};
pub use core::reference::ReferenceSet;
pub use core::sequence::Tag;
pub use core::types::*;
pub use index::{IndexConfig, KmerIndex};
pub use matching::engine::{Classification, MatcherConfig, ModalMatcher, TagMatch};
pub use matching::identity::calc_identity;
