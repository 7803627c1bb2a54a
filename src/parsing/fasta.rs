//! FASTA reader using noodles.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz`, `.fa.bgz` (gzip/bgzip compressed)

use std::ffi::OsStr;
use std::io::BufRead;
use std::path::Path;

use noodles::fasta;

use crate::parsing::{strip_compression, ParseError, SequenceRecord};

/// Check if the path has a FASTA extension
#[must_use]
pub fn is_fasta_file(path: &Path) -> bool {
    matches!(
        strip_compression(path)
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Read every record from a FASTA stream, upper-casing sequences.
///
/// # Errors
///
/// Returns `ParseError::Noodles` if a record cannot be parsed.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();
    visit_fasta(reader, |record| {
        records.push(record);
        Ok::<(), ParseError>(())
    })?;
    Ok(records)
}

/// Hand each record of a FASTA stream to `visit` as it is parsed.
///
/// # Errors
///
/// Returns `ParseError::Noodles` (converted into `E`) if a record cannot be
/// parsed, or the first error returned by `visit`.
pub fn visit_fasta<R, F, E>(reader: R, mut visit: F) -> Result<(), E>
where
    R: BufRead,
    F: FnMut(SequenceRecord) -> Result<(), E>,
    E: From<ParseError>,
{
    let mut fasta_reader = fasta::io::Reader::new(reader);

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        visit(SequenceRecord::new(
            String::from_utf8_lossy(record.name()).to_string(),
            record.sequence().as_ref(),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Tags.FA")));

        assert!(!is_fasta_file(Path::new("reads.fq")));
        assert!(!is_fasta_file(Path::new("test.fai")));
        assert!(!is_fasta_file(Path::new("test.gz")));
    }

    #[test]
    fn test_read_fasta_multiline() {
        let content = b">tag1 description\nACGTACGT\nacgt\n>tag2\nGGGG\n";
        let records = read_fasta(&content[..]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "tag1");
        assert_eq!(records[0].sequence, b"ACGTACGTACGT");
        assert_eq!(records[1].name, "tag2");
        assert_eq!(records[1].sequence, b"GGGG");
    }

    #[test]
    fn test_read_fasta_empty() {
        assert!(read_fasta(&b""[..]).unwrap().is_empty());
    }
}
