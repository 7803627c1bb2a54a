//! Readers for reference tags and reads.
//!
//! - **FASTA** (`.fa`, `.fasta`, `.fna`): reference tags or reads
//! - **FASTQ** (`.fq`, `.fastq`): reads
//!
//! Either may be gzip or bgzip compressed (`.gz`, `.bgz`). Sequences are
//! upper-cased on read; nothing else is rewritten.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tagmatch::parsing::{for_each_chunk, read_reference_set, read_sequences};
//! use std::path::Path;
//!
//! let references = read_reference_set(Path::new("tags.fa")).unwrap();
//! let reads = read_sequences(Path::new("reads.fq.gz")).unwrap();
//!
//! // Or stream large read files a chunk at a time
//! for_each_chunk(Path::new("reads.fq.gz"), 10_000, |chunk| {
//!     println!("{} reads", chunk.len());
//!     Ok::<(), tagmatch::parsing::ParseError>(())
//! })
//! .unwrap();
//! ```

pub mod fasta;
pub mod fastq;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::reference::ReferenceSet;
use crate::core::sequence::Tag;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// A named sequence read from a FASTA or FASTQ file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    /// Upper-cased sequence bytes
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, sequence: &[u8]) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.to_ascii_uppercase(),
        }
    }
}

impl AsRef<[u8]> for SequenceRecord {
    fn as_ref(&self) -> &[u8] {
        &self.sequence
    }
}

/// Path with any `.gz`/`.bgz` suffix removed
pub(crate) fn strip_compression(path: &Path) -> PathBuf {
    if is_gzipped(path) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    }
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz") || e.eq_ignore_ascii_case("bgz"))
}

/// Open a file, decompressing on the fly when it is gzipped
fn open(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        // bgzip is a series of gzip members
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Record layouts recognised by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceFormat {
    Fasta,
    Fastq,
}

impl SequenceFormat {
    fn detect(path: &Path) -> Result<Self, ParseError> {
        if fasta::is_fasta_file(path) {
            Ok(Self::Fasta)
        } else if fastq::is_fastq_file(path) {
            Ok(Self::Fastq)
        } else {
            Err(ParseError::UnsupportedFormat(format!(
                "{} (expected .fa, .fasta, .fna, .fq or .fastq, optionally .gz)",
                path.display()
            )))
        }
    }
}

fn visit_records<F, E>(path: &Path, visit: F) -> Result<(), E>
where
    F: FnMut(SequenceRecord) -> Result<(), E>,
    E: From<ParseError>,
{
    let format = SequenceFormat::detect(path)?;
    let reader = open(path)?;
    match format {
        SequenceFormat::Fasta => fasta::visit_fasta(reader, visit),
        SequenceFormat::Fastq => fastq::visit_fastq(reader, visit),
    }
}

/// Read every record from a FASTA or FASTQ file, chosen by extension.
///
/// # Errors
///
/// Returns `ParseError::UnsupportedFormat` for unknown extensions,
/// `ParseError::Io` if the file cannot be read, or `ParseError::Noodles` if a
/// record cannot be parsed.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();
    visit_records::<_, ParseError>(path, |record| {
        records.push(record);
        Ok(())
    })?;

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Stream a FASTA or FASTQ file to `on_chunk` in batches of at most
/// `chunk_size` records, returning the number of records read.
///
/// Only one chunk is held in memory at a time. A `chunk_size` of 0 is
/// treated as 1.
///
/// # Errors
///
/// Returns the same `ParseError`s as [`read_sequences`] (converted into `E`),
/// or the first error returned by `on_chunk`. Chunks already handed over stay
/// processed.
pub fn for_each_chunk<F, E>(path: &Path, chunk_size: usize, mut on_chunk: F) -> Result<usize, E>
where
    F: FnMut(Vec<SequenceRecord>) -> Result<(), E>,
    E: From<ParseError>,
{
    let chunk_size = chunk_size.max(1);
    let mut chunk = Vec::with_capacity(chunk_size);
    let mut total = 0;

    visit_records::<_, E>(path, |record| {
        chunk.push(record);
        if chunk.len() == chunk_size {
            total += chunk_size;
            on_chunk(std::mem::replace(&mut chunk, Vec::with_capacity(chunk_size)))?;
        }
        Ok(())
    })?;

    if !chunk.is_empty() {
        total += chunk.len();
        on_chunk(chunk)?;
    }

    debug!("Streamed {} records from {}", total, path.display());
    Ok(total)
}

/// Build a reference set from a sequence file.
///
/// Records with a symbol outside {A,C,G,T} are skipped with a warning;
/// repeated sequences keep their first name.
///
/// # Errors
///
/// Returns `ParseError` if the file cannot be read, or
/// `ParseError::InvalidFormat` if no valid record remains.
pub fn read_reference_set(path: &Path) -> Result<ReferenceSet, ParseError> {
    let records = read_sequences(path)?;
    let total = records.len();
    let references = reference_set_from_records(records);

    if references.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "No valid reference sequences in {} ({total} records read)",
            path.display()
        )));
    }
    Ok(references)
}

fn reference_set_from_records(records: Vec<SequenceRecord>) -> ReferenceSet {
    let mut references = ReferenceSet::new();
    for record in records {
        match Tag::new(&record.sequence) {
            Ok(tag) => {
                references.insert(record.name, tag);
            }
            Err(e) => warn!("Skipping reference '{}': {}", record.name, e),
        }
    }
    references
}
