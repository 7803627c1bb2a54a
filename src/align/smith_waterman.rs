use serde::Serialize;
use std::fmt;

use crate::align::scoring::{ScoringScheme, MASK_SYMBOLS};
use crate::core::error::{ConfigurationError, InvalidSequenceError};
use crate::core::kmer::encode_base;

/// Marker for an identical column in the rendered alignment
pub const MATCH_TAG: char = '|';

/// Marker for a mismatch or gap column in the rendered alignment
pub const MISMATCH_TAG: char = ' ';

/// Gap character in the rendered alignment
pub const GAP_CHARACTER: char = '-';

/// Optimal local alignment of sequence A (rows) against sequence B (columns)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentResult {
    /// Alignment score
    pub score: i64,

    /// 0-based offset in sequence A where the alignment begins
    pub row_start: usize,

    /// 0-based offset in sequence B where the alignment begins
    pub col_start: usize,

    /// Exclusive end of the alignment in sequence A
    pub row_end: usize,

    /// Exclusive end of the alignment in sequence B
    pub col_end: usize,

    /// Sequence A with gaps inserted
    pub gapped_a: String,

    /// Column markers: `|` for identical columns, space otherwise
    pub markers: String,

    /// Sequence B with gaps inserted
    pub gapped_b: String,
}

impl AlignmentResult {
    fn empty() -> Self {
        Self {
            score: 0,
            row_start: 0,
            col_start: 0,
            row_end: 0,
            col_end: 0,
            gapped_a: String::new(),
            markers: String::new(),
            gapped_b: String::new(),
        }
    }

    /// Number of alignment columns (matches, mismatches and gaps)
    #[must_use]
    pub fn columns(&self) -> usize {
        self.markers.len()
    }

    /// Number of identical columns
    #[must_use]
    pub fn identities(&self) -> usize {
        self.markers.chars().filter(|&c| c == MATCH_TAG).count()
    }

    /// Number of gap columns
    #[must_use]
    pub fn gaps(&self) -> usize {
        self.gapped_a
            .chars()
            .chain(self.gapped_b.chars())
            .filter(|&c| c == GAP_CHARACTER)
            .count()
    }

    /// Three-line rendering followed by the score
    #[must_use]
    pub fn rendered(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.gapped_a)?;
        writeln!(f, "{}", self.markers)?;
        writeln!(f, "{}", self.gapped_b)?;
        write!(f, "Score: {}", self.score)
    }
}

/// Check that a sequence only holds nucleotides or mask symbols
fn validate_alignable(seq: &[u8]) -> Result<(), InvalidSequenceError> {
    match seq
        .iter()
        .position(|&b| encode_base(b).is_none() && !MASK_SYMBOLS.contains(&b))
    {
        Some(position) => Err(InvalidSequenceError::new(seq[position], position)),
        None => Ok(()),
    }
}

/// Smith–Waterman local aligner with a linear gap cost.
///
/// Cells are accumulated in `i64`, so any valid [`ScoringScheme`] scores
/// sequences of any length that fits in memory without overflow.
///
/// Load a pair with [`load_sequences`](Self::load_sequences), set a
/// [`ScoringScheme`], then ask for the [`score`](Self::score) or the full
/// [`alignment`](Self::alignment). Both are pure functions of the loaded pair
/// and scheme.
///
/// # Example
///
/// ```
/// use tagmatch::align::{ScoringScheme, SmithWaterman};
///
/// let mut aligner = SmithWaterman::with_scoring_scheme(ScoringScheme::new(2, 2, 1).unwrap());
/// aligner.load_sequences(b"ACGTTGCA", b"XXACGTTGCAXX").unwrap();
///
/// let alignment = aligner.alignment().unwrap();
/// assert_eq!(alignment.score, 16);
/// assert_eq!((alignment.row_start, alignment.col_start), (0, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SmithWaterman {
    scheme: Option<ScoringScheme>,
    sequences: Option<(Vec<u8>, Vec<u8>)>,
}

impl SmithWaterman {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scoring_scheme(scheme: ScoringScheme) -> Self {
        Self {
            scheme: Some(scheme),
            sequences: None,
        }
    }

    pub fn set_scoring_scheme(&mut self, scheme: ScoringScheme) {
        self.scheme = Some(scheme);
    }

    /// Load the pair to align; A indexes rows, B indexes columns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` if either sequence holds a symbol other
    /// than `A`, `C`, `G`, `T`, `N` or `X`. The previously loaded pair is kept.
    pub fn load_sequences(&mut self, a: &[u8], b: &[u8]) -> Result<(), InvalidSequenceError> {
        validate_alignable(a)?;
        validate_alignable(b)?;
        self.sequences = Some((a.to_vec(), b.to_vec()));
        Ok(())
    }

    fn ready(&self) -> Result<(&ScoringScheme, &[u8], &[u8]), ConfigurationError> {
        let scheme = self
            .scheme
            .as_ref()
            .ok_or(ConfigurationError::ScoringSchemeNotSet)?;
        let (a, b) = self
            .sequences
            .as_ref()
            .ok_or(ConfigurationError::SequencesNotLoaded)?;
        Ok((scheme, a, b))
    }

    /// Best local alignment score, computed in O(|B|) space.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if no scheme is set or no pair is loaded.
    pub fn score(&self) -> Result<i64, ConfigurationError> {
        let (scheme, a, b) = self.ready()?;
        Ok(best_score(a, b, scheme))
    }

    /// Best local alignment with offsets and rendering.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if no scheme is set or no pair is loaded.
    pub fn alignment(&self) -> Result<AlignmentResult, ConfigurationError> {
        let (scheme, a, b) = self.ready()?;
        Ok(align(a, b, scheme))
    }
}

/// Align a pair in one call.
///
/// # Errors
///
/// Returns `InvalidSequenceError` if either sequence holds a symbol other than
/// `A`, `C`, `G`, `T`, `N` or `X`.
pub fn local_align(
    a: &[u8],
    b: &[u8],
    scheme: &ScoringScheme,
) -> Result<AlignmentResult, InvalidSequenceError> {
    validate_alignable(a)?;
    validate_alignable(b)?;
    Ok(align(a, b, scheme))
}

/// Score-only pass keeping one previous row
fn best_score(a: &[u8], b: &[u8], scheme: &ScoringScheme) -> i64 {
    let gap = i64::from(scheme.gap_cost());
    let mut prev = vec![0i64; b.len() + 1];
    let mut curr = vec![0i64; b.len() + 1];
    let mut best = 0;

    for &ac in a {
        curr[0] = 0;
        for (j, &bc) in b.iter().enumerate() {
            let value = (prev[j] + scheme.substitution(ac, bc))
                .max(prev[j + 1] - gap)
                .max(curr[j] - gap)
                .max(0);
            curr[j + 1] = value;
            best = best.max(value);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// Full matrix fill and traceback
fn align(a: &[u8], b: &[u8], scheme: &ScoringScheme) -> AlignmentResult {
    let gap = i64::from(scheme.gap_cost());
    let width = b.len() + 1;
    let mut h = vec![0i64; (a.len() + 1) * width];

    // First maximal cell in row-major order
    let mut best = (0i64, 0usize, 0usize);

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let diagonal = h[(i - 1) * width + j - 1] + scheme.substitution(a[i - 1], b[j - 1]);
            let up = h[(i - 1) * width + j] - gap;
            let left = h[i * width + j - 1] - gap;
            let value = diagonal.max(up).max(left).max(0);
            h[i * width + j] = value;
            if value > best.0 {
                best = (value, i, j);
            }
        }
    }

    let (score, row_end, col_end) = best;
    if score == 0 {
        return AlignmentResult::empty();
    }

    let mut gapped_a = Vec::new();
    let mut markers = Vec::new();
    let mut gapped_b = Vec::new();

    // Prefer diagonal, then vertical, then horizontal on ties
    let (mut i, mut j) = (row_end, col_end);
    while i > 0 && j > 0 && h[i * width + j] > 0 {
        let value = h[i * width + j];
        let (ac, bc) = (a[i - 1], b[j - 1]);

        if value == h[(i - 1) * width + j - 1] + scheme.substitution(ac, bc) {
            gapped_a.push(ac);
            gapped_b.push(bc);
            markers.push(if ac == bc && !MASK_SYMBOLS.contains(&ac) {
                MATCH_TAG
            } else {
                MISMATCH_TAG
            });
            i -= 1;
            j -= 1;
        } else if value == h[(i - 1) * width + j] - gap {
            gapped_a.push(ac);
            gapped_b.push(GAP_CHARACTER as u8);
            markers.push(MISMATCH_TAG);
            i -= 1;
        } else {
            gapped_a.push(GAP_CHARACTER as u8);
            gapped_b.push(bc);
            markers.push(MISMATCH_TAG);
            j -= 1;
        }
    }

    gapped_a.reverse();
    gapped_b.reverse();
    markers.reverse();

    AlignmentResult {
        score,
        row_start: i,
        col_start: j,
        row_end,
        col_end,
        gapped_a: String::from_utf8_lossy(&gapped_a).into_owned(),
        markers: markers.into_iter().collect(),
        gapped_b: String::from_utf8_lossy(&gapped_b).into_owned(),
    }
}
