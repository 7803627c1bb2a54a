use serde::{Deserialize, Serialize};

use crate::core::error::ConfigurationError;

/// Symbols accepted by the aligner in addition to {A,C,G,T}. They stand for
/// masked or unknown positions and never match anything, themselves included.
pub const MASK_SYMBOLS: [u8; 2] = [b'N', b'X'];

/// Immutable scoring parameters for local alignment.
///
/// Mismatch and gap costs are stored as non-negative magnitudes and
/// subtracted during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringScheme {
    match_reward: i32,
    mismatch_penalty: i32,
    gap_cost: i32,
}

impl ScoringScheme {
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidScoringScheme` unless
    /// `match_reward > 0`, `mismatch_penalty >= 0` and `gap_cost >= 0`.
    pub fn new(
        match_reward: i32,
        mismatch_penalty: i32,
        gap_cost: i32,
    ) -> Result<Self, ConfigurationError> {
        if match_reward <= 0 {
            return Err(ConfigurationError::InvalidScoringScheme(format!(
                "match reward must be positive, got {match_reward}"
            )));
        }
        if mismatch_penalty < 0 {
            return Err(ConfigurationError::InvalidScoringScheme(format!(
                "mismatch penalty must be non-negative, got {mismatch_penalty}"
            )));
        }
        if gap_cost < 0 {
            return Err(ConfigurationError::InvalidScoringScheme(format!(
                "gap cost must be non-negative, got {gap_cost}"
            )));
        }
        Ok(Self {
            match_reward,
            mismatch_penalty,
            gap_cost,
        })
    }

    #[must_use]
    pub fn match_reward(&self) -> i32 {
        self.match_reward
    }

    #[must_use]
    pub fn mismatch_penalty(&self) -> i32 {
        self.mismatch_penalty
    }

    #[must_use]
    pub fn gap_cost(&self) -> i32 {
        self.gap_cost
    }

    /// Score for aligning `a` against `b`
    #[inline]
    #[must_use]
    pub fn substitution(&self, a: u8, b: u8) -> i64 {
        if a == b && !MASK_SYMBOLS.contains(&a) {
            i64::from(self.match_reward)
        } else {
            -i64::from(self.mismatch_penalty)
        }
    }
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_reward: 2,
            mismatch_penalty: 2,
            gap_cost: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_scheme() {
        let scheme = ScoringScheme::new(2, 2, 1).unwrap();
        assert_eq!(scheme, ScoringScheme::default());
        assert_eq!(scheme.substitution(b'A', b'A'), 2);
        assert_eq!(scheme.substitution(b'A', b'C'), -2);
    }

    #[test]
    fn test_zero_costs_allowed() {
        let scheme = ScoringScheme::new(1, 0, 0).unwrap();
        assert_eq!(scheme.substitution(b'G', b'T'), 0);
        assert_eq!(scheme.gap_cost(), 0);
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            ScoringScheme::new(0, 1, 1),
            Err(ConfigurationError::InvalidScoringScheme(_))
        ));
        assert!(matches!(
            ScoringScheme::new(-2, 1, 1),
            Err(ConfigurationError::InvalidScoringScheme(_))
        ));
        assert!(ScoringScheme::new(2, -1, 1).is_err());
        assert!(ScoringScheme::new(2, 1, -1).is_err());
    }

    #[test]
    fn test_extreme_parameters_accepted() {
        let scheme = ScoringScheme::new(i32::MAX, i32::MAX, i32::MAX).unwrap();
        assert_eq!(scheme.substitution(b'A', b'A'), i64::from(i32::MAX));
        assert_eq!(scheme.substitution(b'A', b'C'), -i64::from(i32::MAX));
    }

    #[test]
    fn test_masked_symbols_never_match() {
        let scheme = ScoringScheme::default();
        assert_eq!(scheme.substitution(b'N', b'N'), -2);
        assert_eq!(scheme.substitution(b'X', b'X'), -2);
        assert_eq!(scheme.substitution(b'X', b'A'), -2);
    }
}
