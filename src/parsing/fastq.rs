//! FASTQ reader using noodles. Qualities are discarded.

use std::ffi::OsStr;
use std::io::BufRead;
use std::path::Path;

use noodles::fastq;

use crate::parsing::{strip_compression, ParseError, SequenceRecord};

/// Check if the path has a FASTQ extension
#[must_use]
pub fn is_fastq_file(path: &Path) -> bool {
    matches!(
        strip_compression(path)
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fq" | "fastq")
    )
}

/// Read every record from a FASTQ stream, upper-casing sequences.
///
/// # Errors
///
/// Returns `ParseError::Noodles` if a record cannot be parsed.
pub fn read_fastq<R: BufRead>(reader: R) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();
    visit_fastq(reader, |record| {
        records.push(record);
        Ok::<(), ParseError>(())
    })?;
    Ok(records)
}

/// Hand each record of a FASTQ stream to `visit` as it is parsed.
///
/// # Errors
///
/// Returns `ParseError::Noodles` (converted into `E`) if a record cannot be
/// parsed, or the first error returned by `visit`.
pub fn visit_fastq<R, F, E>(reader: R, mut visit: F) -> Result<(), E>
where
    R: BufRead,
    F: FnMut(SequenceRecord) -> Result<(), E>,
    E: From<ParseError>,
{
    let mut fastq_reader = fastq::io::Reader::new(reader);

    for result in fastq_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;

        visit(SequenceRecord::new(
            String::from_utf8_lossy(record.name()).to_string(),
            record.sequence(),
        ))?;
    }

    Ok(())
}
