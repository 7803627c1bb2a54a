use crate::align::scoring::ScoringScheme;
use crate::align::smith_waterman::local_align;
use crate::core::error::InvalidSequenceError;

pub use crate::align::edit_distance::levenshtein_distance;

/// Length and identity of the best local alignment of `query` against
/// `reference` under the default scoring scheme.
///
/// Returns `(matched_length, identity_count)`: the number of alignment
/// columns (matches, mismatches and gaps) and how many of them are identical.
///
/// # Errors
///
/// Returns `InvalidSequenceError` if either sequence holds a symbol the
/// aligner does not accept.
pub fn calc_identity(query: &[u8], reference: &[u8]) -> Result<(usize, usize), InvalidSequenceError> {
    let alignment = local_align(query, reference, &ScoringScheme::default())?;
    Ok((alignment.columns(), alignment.identities()))
}
