use serde::{Deserialize, Serialize};

/// Identifier of a tag within its reference set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub u32);

impl TagId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strategy used to pick a reference tag for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Reference tag receiving the most k-mer votes
    #[default]
    ModalKmer,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModalKmer => write!(f, "modal_kmer"),
        }
    }
}

/// Confidence in a modal match, from the fraction of query windows that voted
/// for the winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    #[must_use]
    pub fn from_vote_fraction(fraction: f64) -> Self {
        if fraction >= 1.0 {
            Self::Exact
        } else if fraction >= 0.75 {
            Self::High
        } else if fraction >= 0.40 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_from_vote_fraction() {
        assert_eq!(Confidence::from_vote_fraction(1.0), Confidence::Exact);
        assert_eq!(Confidence::from_vote_fraction(0.8), Confidence::High);
        assert_eq!(Confidence::from_vote_fraction(0.5), Confidence::Medium);
        assert_eq!(Confidence::from_vote_fraction(0.1), Confidence::Low);
        assert!(Confidence::Exact > Confidence::Low);
    }

    #[test]
    fn test_match_type_serde() {
        let json = serde_json::to_string(&MatchType::ModalKmer).unwrap();
        assert_eq!(json, "\"modal_kmer\"");
    }
}
