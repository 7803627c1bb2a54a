//! Core data types for sequence identification.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Tag`]: An immutable nucleotide sequence over {A,C,G,T}
//! - [`ReferenceSet`]: A deduplicated, id-addressed collection of tags
//! - [`TagId`], [`MatchType`], [`Confidence`]: Identifiers and result classification
//! - [`ConfigurationError`], [`InvalidSequenceError`]: Setup and input errors
//! - [`kmer`]: 2-bit encoding, reverse complement and rolling k-mer keys
//!
//! ## Alphabet
//!
//! Tags are strictly uppercase `A`, `C`, `G`, `T`. Anything else is rejected,
//! never transliterated; readers upper-case input before it gets here.
//!
//! [`Tag`]: sequence::Tag
//! [`ReferenceSet`]: reference::ReferenceSet
//! [`TagId`]: types::TagId
//! [`MatchType`]: types::MatchType
//! [`Confidence`]: types::Confidence
//! [`ConfigurationError`]: error::ConfigurationError
//! [`InvalidSequenceError`]: error::InvalidSequenceError

pub mod error;
pub mod kmer;
pub mod reference;
pub mod sequence;
pub mod types;
