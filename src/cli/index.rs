//! Index command - build a k-mer index from reference tags and save it.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::index::builder::{DEFAULT_MAX_WORD_COPIES, DEFAULT_WORD_LENGTH};
use crate::index::{IndexConfig, IndexStats, KmerIndex};
use crate::parsing;

/// Options shared by every command that builds an index
#[derive(Args, Debug, Clone)]
pub struct IndexOptions {
    /// Word length k (1-32)
    #[arg(short = 'k', long, default_value_t = DEFAULT_WORD_LENGTH)]
    pub word_length: usize,

    /// Drop words occurring more than this many times across all tags
    #[arg(long, default_value_t = DEFAULT_MAX_WORD_COPIES)]
    pub max_word_copies: usize,

    /// Also index reverse complements so reads from either strand match
    #[arg(long)]
    pub bidirectional: bool,
}

impl IndexOptions {
    #[must_use]
    pub fn to_config(&self) -> IndexConfig {
        IndexConfig::default()
            .with_word_length(self.word_length)
            .with_max_word_copies(self.max_word_copies)
            .with_search_bidirectional(self.bidirectional)
    }
}

/// Arguments for the index command
#[derive(Args)]
pub struct IndexArgs {
    /// Reference tags (FASTA or FASTQ, optionally gzipped)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Output index file
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: IndexOptions,
}

/// Execute the index command
///
/// # Errors
///
/// Returns an error if the reference cannot be read, the index cannot be
/// built, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: IndexArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let index = build_index(&args.reference, &args.options)?;
    index.save(&args.output)?;

    if verbose {
        eprintln!("Wrote index to {}", args.output.display());
    }

    let stats = index.stats();
    match format {
        OutputFormat::Text => print_text_stats(&args, index.config(), stats),
        OutputFormat::Json => print_json_stats(&args, index.config(), stats)?,
        OutputFormat::Tsv => print_tsv_stats(&args, index.config(), stats),
    }

    Ok(())
}

/// Read reference tags and build an index over them
///
/// # Errors
///
/// Returns an error if the reference cannot be read or the config is invalid.
pub fn build_index(reference: &std::path::Path, options: &IndexOptions) -> anyhow::Result<KmerIndex> {
    let references = parsing::read_reference_set(reference)?;
    info!(
        "Loaded {} reference tags from {}",
        references.len(),
        reference.display()
    );
    Ok(KmerIndex::build(references, &options.to_config())?)
}

fn print_text_stats(args: &IndexArgs, config: &IndexConfig, stats: &IndexStats) {
    println!("Index: {}", args.output.display());
    println!("   Reference: {}", args.reference.display());
    println!(
        "   Word length: {} (bidirectional: {})",
        config.word_length, config.search_bidirectional
    );
    println!("   Max word copies: {}", config.max_word_copies);
    println!(
        "   Tags: {} indexed, {} shorter than k",
        stats.tags_indexed, stats.tags_too_short
    );
    println!(
        "   Words: {} kept, {} dropped",
        stats.distinct_words, stats.dropped_words
    );
}

fn print_json_stats(
    args: &IndexArgs,
    config: &IndexConfig,
    stats: &IndexStats,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "index": args.output.display().to_string(),
        "reference": args.reference.display().to_string(),
        "config": config,
        "stats": stats,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_stats(args: &IndexArgs, config: &IndexConfig, stats: &IndexStats) {
    println!("index\treference\tword_length\tmax_word_copies\tbidirectional\ttags_indexed\ttags_too_short\twords_kept\twords_dropped");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        args.output.display(),
        args.reference.display(),
        config.word_length,
        config.max_word_copies,
        config.search_bidirectional,
        stats.tags_indexed,
        stats.tags_too_short,
        stats.distinct_words,
        stats.dropped_words
    );
}
