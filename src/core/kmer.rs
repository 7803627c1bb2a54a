//! 2-bit nucleotide encoding and rolling k-mer keys.
//!
//! Encoding: A=0, C=1, G=2, T=3, so the complement of a code `c` is `3 - c`.
//! A word of up to [`MAX_WORD_LENGTH`] bases packs into one `u64`, first base
//! in the most significant position.

/// Longest word that fits a packed `u64` key
pub const MAX_WORD_LENGTH: usize = 32;

/// Lookup table from ASCII to 2-bit code; 4 marks a symbol outside {A,C,G,T}
const BASE_TO_CODE: [u8; 256] = {
    let mut table = [4u8; 256];
    table[b'A' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'T' as usize] = 3;
    table
};

const CODE_TO_BASE: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Encode a single uppercase nucleotide. Returns `None` for anything else.
#[inline]
#[must_use]
pub fn encode_base(base: u8) -> Option<u8> {
    match BASE_TO_CODE[base as usize] {
        4 => None,
        code => Some(code),
    }
}

/// Decode a 2-bit code back to its nucleotide
#[inline]
#[must_use]
pub fn decode_base(code: u8) -> u8 {
    CODE_TO_BASE[(code & 3) as usize]
}

/// Complement of a single nucleotide, passing other symbols through unchanged
#[inline]
#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

/// Reverse complement of a sequence
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Bit mask covering `k` packed bases
#[inline]
#[must_use]
pub fn word_mask(k: usize) -> u64 {
    if k >= MAX_WORD_LENGTH {
        u64::MAX
    } else {
        (1u64 << (2 * k)) - 1
    }
}

/// Pack a word of exactly `word.len()` bases. Returns `None` if the word is too
/// long or contains a symbol outside {A,C,G,T}.
#[must_use]
pub fn encode_word(word: &[u8]) -> Option<u64> {
    if word.len() > MAX_WORD_LENGTH {
        return None;
    }
    word.iter()
        .try_fold(0u64, |key, &b| encode_base(b).map(|c| (key << 2) | u64::from(c)))
}

/// Unpack a key into its `k` bases
#[must_use]
pub fn decode_word(key: u64, k: usize) -> Vec<u8> {
    (0..k)
        .rev()
        .map(|i| {
            #[allow(clippy::cast_possible_truncation)] // masked to 2 bits
            let code = ((key >> (2 * i)) & 3) as u8;
            decode_base(code)
        })
        .collect()
}

/// Reverse complement of a packed word of length `k`
#[must_use]
pub fn reverse_complement_word(key: u64, k: usize) -> u64 {
    let mut fwd = key;
    let mut rc = 0u64;
    for _ in 0..k {
        rc = (rc << 2) | (3 - (fwd & 3));
        fwd >>= 2;
    }
    rc
}

/// A valid window produced by [`KmerIter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kmer {
    /// 0-based start of the window
    pub position: usize,
    /// Packed forward-strand key
    pub forward: u64,
    /// Packed key of the window's reverse complement
    pub reverse: u64,
}

/// Rolling iterator over every complete `k`-window of a sequence.
///
/// Windows overlapping a symbol outside {A,C,G,T} are skipped; the roll
/// restarts after the offending symbol. Allocation free.
pub struct KmerIter<'a> {
    seq: &'a [u8],
    k: usize,
    mask: u64,
    rc_shift: usize,
    pos: usize,
    valid: usize,
    forward: u64,
    reverse: u64,
}

impl<'a> KmerIter<'a> {
    /// `k` must be in `1..=MAX_WORD_LENGTH`; callers validate it up front.
    #[must_use]
    pub fn new(seq: &'a [u8], k: usize) -> Self {
        debug_assert!((1..=MAX_WORD_LENGTH).contains(&k));
        Self {
            seq,
            k,
            mask: word_mask(k),
            rc_shift: 2 * (k - 1),
            pos: 0,
            valid: 0,
            forward: 0,
            reverse: 0,
        }
    }
}

impl Iterator for KmerIter<'_> {
    type Item = Kmer;

    fn next(&mut self) -> Option<Kmer> {
        while self.pos < self.seq.len() {
            let base = self.seq[self.pos];
            self.pos += 1;

            let Some(code) = encode_base(base) else {
                self.valid = 0;
                self.forward = 0;
                self.reverse = 0;
                continue;
            };

            let code = u64::from(code);
            self.forward = ((self.forward << 2) | code) & self.mask;
            self.reverse = (self.reverse >> 2) | ((3 - code) << self.rc_shift);
            self.valid += 1;

            if self.valid >= self.k {
                return Some(Kmer {
                    position: self.pos - self.k,
                    forward: self.forward,
                    reverse: self.reverse,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.seq.len() - self.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_word() {
        let key = encode_word(b"ACGT").unwrap();
        assert_eq!(key, 0b00_01_10_11);
        assert_eq!(decode_word(key, 4), b"ACGT");
    }

    #[test]
    fn test_encode_word_rejects_ambiguous() {
        assert!(encode_word(b"ACNT").is_none());
        assert!(encode_word(b"acgt").is_none());
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"AACG"), b"CGTT");
        assert_eq!(reverse_complement(b""), b"");
    }

    #[test]
    fn test_reverse_complement_word_matches_sequence() {
        let seq = b"GATTACAGG";
        let key = encode_word(seq).unwrap();
        let expected = encode_word(&reverse_complement(seq)).unwrap();
        assert_eq!(reverse_complement_word(key, seq.len()), expected);
    }

    #[test]
    fn test_kmer_iter_all_windows() {
        let kmers: Vec<Kmer> = KmerIter::new(b"ACGTA", 3).collect();
        assert_eq!(kmers.len(), 3);
        assert_eq!(kmers[0].position, 0);
        assert_eq!(kmers[0].forward, encode_word(b"ACG").unwrap());
        assert_eq!(kmers[2].forward, encode_word(b"GTA").unwrap());
        for kmer in &kmers {
            assert_eq!(kmer.reverse, reverse_complement_word(kmer.forward, 3));
        }
    }

    #[test]
    fn test_kmer_iter_skips_invalid_symbols() {
        let positions: Vec<usize> = KmerIter::new(b"ACGNACGT", 3).map(|k| k.position).collect();
        assert_eq!(positions, vec![0, 4, 5]);
    }

    #[test]
    fn test_kmer_iter_short_sequence() {
        assert_eq!(KmerIter::new(b"AC", 3).count(), 0);
    }

    #[test]
    fn test_kmer_iter_full_width_word() {
        let seq = b"ACGTACGTACGTACGTACGTACGTACGTACGTA";
        let kmers: Vec<Kmer> = KmerIter::new(seq, MAX_WORD_LENGTH).collect();
        assert_eq!(kmers.len(), 2);
        assert_eq!(kmers[1].forward, encode_word(&seq[1..]).unwrap());
        assert_eq!(
            kmers[1].reverse,
            encode_word(&reverse_complement(&seq[1..])).unwrap()
        );
    }
}
