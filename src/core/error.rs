use thiserror::Error;

/// Setup mistakes made once, before any scan or DP runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid word length {0}: must be between 1 and {max}", max = crate::core::kmer::MAX_WORD_LENGTH)]
    InvalidWordLength(usize),

    #[error("Invalid max word copies {0}: must be at least 1")]
    InvalidMaxWordCopies(usize),

    #[error("Reference set is empty")]
    EmptyReferenceSet,

    #[error("Index too large: {0} bucket entries exceed the addressable arena")]
    IndexCapacityExceeded(usize),

    #[error("Invalid scoring scheme: {0}")]
    InvalidScoringScheme(String),

    #[error("No scoring scheme set")]
    ScoringSchemeNotSet,

    #[error("No sequences loaded")]
    SequencesNotLoaded,
}

/// A sequence contained a symbol outside the accepted alphabet.
///
/// Recoverable: the caller skips the offending read or pair and continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid symbol {symbol:?} at position {position}")]
pub struct InvalidSequenceError {
    /// Offending symbol
    pub symbol: char,
    /// 0-based position of the offending byte
    pub position: usize,
}

impl InvalidSequenceError {
    #[must_use]
    pub fn new(symbol: u8, position: usize) -> Self {
        Self {
            symbol: char::from(symbol),
            position,
        }
    }
}
