//! Command-line interface for tagmatch.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **index**: Build a k-mer index from a FASTA/FASTQ file of reference tags
//! - **classify**: Assign each read to its modal reference tag
//! - **align**: Locally align two sequences and report score and offsets
//!
//! ## Usage
//!
//! ```text
//! # Build an index once
//! tagmatch index tags.fa -o tags.idx -k 16
//!
//! # Classify reads against it
//! tagmatch classify reads.fq.gz --index tags.idx --threads 8
//!
//! # Or index on the fly, with alignment identity for every hit
//! tagmatch classify reads.fq --reference tags.fa -k 12 --identity --format tsv
//!
//! # Align a pair
//! tagmatch align CGGGTGTGACAGTCGTGCAG ACGGTGTGACAGTCGTGCAG
//! ```

use clap::{Parser, Subcommand};

pub mod align;
pub mod classify;
pub mod index;

#[derive(Parser)]
#[command(name = "tagmatch")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Classify short reads against reference tags by k-mer vote")]
#[command(
    long_about = "tagmatch assigns short nucleotide reads to the reference tag they most likely came from.\n\nIt builds a k-mer word index over the reference tags and picks, for each read, the tag that the most read k-mers point to. Matched pairs can be scored with Smith-Waterman local alignment and Levenshtein edit distance."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a k-mer index from reference tags
    Index(index::IndexArgs),

    /// Classify reads against reference tags
    Classify(classify::ClassifyArgs),

    /// Locally align two sequences
    Align(align::AlignArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
