//! K-mer word index over a reference set.
//!
//! [`KmerIndex::build`] slides a window of `k` bases over every reference tag
//! and records, for each packed word, the ids of the tags containing it. Words
//! that occur more than `max_word_copies` times are dropped as uninformative.
//!
//! ## Example
//!
//! ```
//! use tagmatch::core::reference::ReferenceSet;
//! use tagmatch::core::types::TagId;
//! use tagmatch::index::{IndexConfig, KmerIndex};
//!
//! let refs = ReferenceSet::from_sequences(["ACGTACGT", "AACCGGTT"]).unwrap();
//! let index = KmerIndex::build(refs, &IndexConfig::default().with_word_length(4)).unwrap();
//!
//! assert_eq!(index.lookup(b"CCGG"), &[TagId(1)]);
//! ```
//!
//! Built indexes can be written with [`KmerIndex::save`] and read back with
//! [`KmerIndex::load`] so a large reference set is only scanned once.

pub mod builder;
pub mod store;

pub use builder::{IndexConfig, IndexStats};
pub use store::{IndexFile, IndexFileError, KmerIndex, INDEX_FORMAT_VERSION};
