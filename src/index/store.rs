use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::kmer::encode_word;
use crate::core::reference::ReferenceSet;
use crate::core::types::TagId;
use crate::index::builder::{IndexConfig, IndexStats};

#[derive(Error, Debug)]
pub enum IndexFileError {
    #[error("Failed to access index file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode index: {0}")]
    Encode(#[from] bincode::Error),

    #[error("Index format version mismatch (expected {expected}, found {found})")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Index file is corrupt: {0}")]
    Corrupt(String),
}

/// Index file format version for compatibility checking
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Range of one word's tag ids inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    start: u32,
    len: u32,
}

impl Bucket {
    /// `None` if either bound does not fit a `u32`
    pub(crate) fn new(start: usize, len: usize) -> Option<Self> {
        let end = u32::try_from(start.checked_add(len)?).ok()?;
        let len = u32::try_from(len).ok()?;
        Some(Self {
            start: end - len,
            len,
        })
    }

    fn range(self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }
}

/// Immutable k-mer index over a reference set.
///
/// Every word maps to a bucket of the tag ids containing it, stored as a
/// range into one contiguous arena. Built once with [`KmerIndex::build`] and
/// shared read-only across matchers and threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KmerIndex {
    pub(crate) config: IndexConfig,
    pub(crate) references: ReferenceSet,
    pub(crate) buckets: FxHashMap<u64, Bucket>,
    pub(crate) arena: Vec<TagId>,
    pub(crate) stats: IndexStats,
}

impl KmerIndex {
    /// Tag ids whose sequence contains `word`. Empty when the word is absent,
    /// has the wrong length, or contains a symbol outside {A,C,G,T}.
    #[must_use]
    pub fn lookup(&self, word: &[u8]) -> &[TagId] {
        if word.len() != self.config.word_length {
            return &[];
        }
        encode_word(word).map_or(&[], |key| self.lookup_key(key))
    }

    /// Tag ids stored under a packed word key
    #[inline]
    #[must_use]
    pub fn lookup_key(&self, key: u64) -> &[TagId] {
        self.buckets
            .get(&key)
            .and_then(|bucket| self.arena.get(bucket.range()))
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.config.word_length
    }

    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[must_use]
    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    #[must_use]
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Number of distinct words kept
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate `(key, ids)` for every kept word, in no particular order
    pub fn words(&self) -> impl Iterator<Item = (u64, &[TagId])> {
        self.buckets.keys().map(|&key| (key, self.lookup_key(key)))
    }

    /// Write the index to `path` in the binary index format
    ///
    /// # Errors
    ///
    /// Returns `IndexFileError` if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), IndexFileError> {
        let file = IndexFileRef {
            version: INDEX_FORMAT_VERSION,
            created_at: chrono::Utc::now().to_rfc3339(),
            index: self,
        };
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, &file)?;
        writer.flush()?;
        debug!("Wrote index with {} words to {}", self.len(), path.display());
        Ok(())
    }

    /// Load an index previously written by [`KmerIndex::save`]
    ///
    /// # Errors
    ///
    /// Returns `IndexFileError` if the file cannot be read, was written by a
    /// different format version, or fails consistency checks.
    pub fn load(path: &Path) -> Result<Self, IndexFileError> {
        let file = IndexFile::load(path)?;
        debug!(
            "Loaded index created at {} with {} words",
            file.created_at,
            file.index.len()
        );
        Ok(file.index)
    }

    fn check_consistency(&self) -> Result<(), IndexFileError> {
        self.config
            .validate()
            .map_err(|e| IndexFileError::Corrupt(e.to_string()))?;

        for bucket in self.buckets.values() {
            let range = bucket.range();
            if bucket.len == 0 || range.end > self.arena.len() {
                return Err(IndexFileError::Corrupt(format!(
                    "bucket {}..{} outside arena of {}",
                    range.start,
                    range.end,
                    self.arena.len()
                )));
            }
        }

        if let Some(id) = self
            .arena
            .iter()
            .find(|id| id.index() >= self.references.len())
        {
            return Err(IndexFileError::Corrupt(format!(
                "tag id {id} outside reference set of {}",
                self.references.len()
            )));
        }
        Ok(())
    }
}

/// On-disk index with its format version and creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    pub version: u32,
    pub created_at: String,
    pub index: KmerIndex,
}

#[derive(Serialize)]
struct IndexFileRef<'a> {
    version: u32,
    created_at: String,
    index: &'a KmerIndex,
}

impl IndexFile {
    /// # Errors
    ///
    /// Returns `IndexFileError` if the file cannot be read, was written by a
    /// different format version, or fails consistency checks.
    pub fn load(path: &Path) -> Result<Self, IndexFileError> {
        let bytes = std::fs::read(path)?;

        // Version leads the encoding, so check it before decoding the rest
        let found: u32 = bincode::deserialize(&bytes)?;
        if found != INDEX_FORMAT_VERSION {
            return Err(IndexFileError::VersionMismatch {
                expected: INDEX_FORMAT_VERSION,
                found,
            });
        }

        let file: Self = bincode::deserialize(&bytes)?;
        file.index.check_consistency()?;
        Ok(file)
    }
}
