//! Pairwise scoring of a read against a candidate tag.
//!
//! - [`ScoringScheme`]: match reward, mismatch penalty and linear gap cost
//! - [`SmithWaterman`]: local alignment with offsets and a rendered alignment
//! - [`levenshtein_distance`]: unit-cost edit distance
//!
//! The aligner accepts `N` and `X` as masking symbols on top of {A,C,G,T};
//! they are scored as a mismatch against everything.

pub mod edit_distance;
pub mod scoring;
pub mod smith_waterman;

pub use edit_distance::levenshtein_distance;
pub use scoring::ScoringScheme;
pub use smith_waterman::{local_align, AlignmentResult, SmithWaterman};
