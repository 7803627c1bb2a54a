use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::InvalidSequenceError;
use crate::core::kmer::encode_base;

/// Longest tag that gets a packed 2-bit representation
pub const MAX_PACKED_LENGTH: usize = 255;

/// Bases stored per packed `u64` word
const BASES_PER_WORD: usize = 32;

/// Check that every byte is an uppercase nucleotide.
///
/// # Errors
///
/// Returns `InvalidSequenceError` for the first byte outside {A,C,G,T}.
pub fn validate_nucleotides(seq: &[u8]) -> Result<(), InvalidSequenceError> {
    match seq.iter().position(|&b| encode_base(b).is_none()) {
        Some(position) => Err(InvalidSequenceError::new(seq[position], position)),
        None => Ok(()),
    }
}

/// An immutable nucleotide sequence over {A,C,G,T}.
///
/// Equality, hashing and ordering are by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(Box<[u8]>);

impl Tag {
    /// Build a tag from uppercase nucleotides.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` if any symbol is outside {A,C,G,T}.
    pub fn new(seq: impl AsRef<[u8]>) -> Result<Self, InvalidSequenceError> {
        let seq = seq.as_ref();
        validate_nucleotides(seq)?;
        Ok(Self(seq.into()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Validated as ASCII nucleotides on construction
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Packed 2-bit representation, or `None` above [`MAX_PACKED_LENGTH`]
    #[must_use]
    pub fn packed(&self) -> Option<PackedTag> {
        PackedTag::pack(self)
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = InvalidSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Tag {
    type Error = InvalidSequenceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.as_str().to_string()
    }
}

/// 2-bit-per-base encoding of a short tag, 32 bases per word, first base in
/// the most significant bits of the first word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedTag {
    words: Vec<u64>,
    len: u8,
}

impl PackedTag {
    fn pack(tag: &Tag) -> Option<Self> {
        let len = u8::try_from(tag.len()).ok()?;
        let words = tag
            .as_bytes()
            .chunks(BASES_PER_WORD)
            .map(|chunk| {
                let word = chunk.iter().fold(0u64, |word, &b| {
                    (word << 2) | u64::from(encode_base(b).unwrap_or(0))
                });
                // Left-align a partial final word
                word << (2 * (BASES_PER_WORD - chunk.len()))
            })
            .collect();
        Some(Self { words, len })
    }

    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode back into a tag
    #[must_use]
    pub fn unpack(&self) -> Tag {
        let seq: Vec<u8> = (0..self.len())
            .map(|i| {
                let word = self.words[i / BASES_PER_WORD];
                let shift = 2 * (BASES_PER_WORD - 1 - i % BASES_PER_WORD);
                #[allow(clippy::cast_possible_truncation)] // masked to 2 bits
                let code = ((word >> shift) & 3) as u8;
                crate::core::kmer::decode_base(code)
            })
            .collect();
        Tag(seq.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new_valid() {
        let tag = Tag::new("ACGTACGT").unwrap();
        assert_eq!(tag.len(), 8);
        assert_eq!(tag.as_str(), "ACGTACGT");
        assert_eq!(tag.to_string(), "ACGTACGT");
    }

    #[test]
    fn test_tag_rejects_invalid_symbol() {
        let err = Tag::new("ACGNT").unwrap_err();
        assert_eq!(err.symbol, 'N');
        assert_eq!(err.position, 3);
    }

    #[test]
    fn test_tag_rejects_lowercase() {
        assert!(Tag::new("acgt").is_err());
    }

    #[test]
    fn test_tag_value_equality() {
        let a = Tag::new("AACCGGTT").unwrap();
        let b: Tag = "AACCGGTT".parse().unwrap();
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_packed_roundtrip_across_word_boundary() {
        let seq = "ACGTTGCAACGTTGCAACGTTGCAACGTTGCAGGT"; // 35 bases
        let tag = Tag::new(seq).unwrap();
        let packed = tag.packed().unwrap();
        assert_eq!(packed.len(), 35);
        assert_eq!(packed.words().len(), 2);
        assert_eq!(packed.unpack(), tag);
    }

    #[test]
    fn test_packed_none_for_long_tag() {
        let tag = Tag::new("A".repeat(MAX_PACKED_LENGTH + 1)).unwrap();
        assert!(tag.packed().is_none());
        let tag = Tag::new("A".repeat(MAX_PACKED_LENGTH)).unwrap();
        assert!(tag.packed().is_some());
    }

    #[test]
    fn test_tag_serde_as_string() {
        let tag = Tag::new("GATTACA").unwrap();
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"GATTACA\"");
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
        assert!(serde_json::from_str::<Tag>("\"GATXACA\"").is_err());
    }
}
