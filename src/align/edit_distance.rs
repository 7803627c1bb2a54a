/// Levenshtein distance with unit cost for insertion, deletion and
/// substitution.
///
/// Runs in O(|a|·|b|) time and keeps a single row sized to the shorter input.
///
/// # Examples
///
/// ```
/// use tagmatch::align::edit_distance::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance(b"ACGT", b"ACGT"), 0);
/// assert_eq!(levenshtein_distance(b"ACGT", b"AGGT"), 1);
/// assert_eq!(levenshtein_distance(b"ACGT", b"ACT"), 1);
/// ```
#[must_use]
pub fn levenshtein_distance(a: &[u8], b: &[u8]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, &lc) in long.iter().enumerate() {
        // row[0] before overwrite is the diagonal for column 1
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &sc) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(lc != sc);
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;

            diagonal = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }

    row[short.len()]
}
