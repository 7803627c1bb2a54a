//! Classify command - assign each read to its modal reference tag.

use std::path::PathBuf;

use clap::Args;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cli::index::{build_index, IndexOptions};
use crate::cli::OutputFormat;
use crate::index::KmerIndex;
use crate::matching::{
    calc_identity, classify_batch, levenshtein_distance, BatchSummary, Classification,
    MatcherConfig, ModalMatcher, TagMatch,
};
use crate::parsing::{self, SequenceRecord};

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Reads to classify (FASTA or FASTQ, optionally gzipped)
    #[arg(required = true)]
    pub reads: PathBuf,

    /// Prebuilt index from `tagmatch index`
    #[arg(short, long, conflicts_with = "reference", required_unless_present = "reference")]
    pub index: Option<PathBuf>,

    /// Reference tags to index before classifying
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    #[command(flatten)]
    pub index_options: IndexOptions,

    /// Report reads whose best tag has fewer votes as unmatched
    #[arg(long, default_value = "1")]
    pub min_votes: u32,

    /// Align each matched read to its tag and report identity and edit distance
    #[arg(long)]
    pub identity: bool,

    /// Worker threads (defaults to all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Reads classified per parallel batch
const READ_CHUNK_SIZE: usize = 16_384;

/// Alignment figures for a matched read
#[derive(Debug, Clone, Copy)]
struct Identity {
    aligned_length: usize,
    identities: usize,
    edit_distance: usize,
}

/// One classified read
struct ReadResult<'r, 'i> {
    read: &'r SequenceRecord,
    classification: Classification<'i>,
    identity: Option<Identity>,
}

/// Execute the classify command
///
/// Reads are streamed from disk in chunks; text and TSV rows are written as
/// each chunk finishes. JSON output is assembled once every read is seen.
///
/// # Errors
///
/// Returns an error if the index or reads cannot be loaded.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let index = load_index(&args)?;
    let matcher = ModalMatcher::with_config(
        &index,
        MatcherConfig {
            min_votes: args.min_votes,
        },
    );

    let mut summary = BatchSummary::default();
    let mut json_reads = Vec::new();
    if let OutputFormat::Tsv = format {
        print_tsv_header(args.identity);
    }

    let total = parsing::for_each_chunk(
        &args.reads,
        READ_CHUNK_SIZE,
        |reads: Vec<SequenceRecord>| -> anyhow::Result<()> {
            let classifications = classify_batch(&matcher, &reads);
            summary.add(&classifications);

            let identities: Vec<Option<Identity>> = if args.identity {
                reads
                    .par_iter()
                    .zip(classifications.par_iter())
                    .map(|(read, classification)| match classification {
                        Ok(Some(m)) => identity(read, m),
                        _ => None,
                    })
                    .collect()
            } else {
                vec![None; reads.len()]
            };

            let results: Vec<ReadResult<'_, '_>> = reads
                .iter()
                .zip(classifications)
                .zip(identities)
                .map(|((read, classification), identity)| ReadResult {
                    read,
                    classification,
                    identity,
                })
                .collect();

            for result in &results {
                if let Err(e) = &result.classification {
                    warn!("Rejected read '{}': {}", result.read.name, e);
                }
            }

            match format {
                OutputFormat::Text => print_text_rows(&results),
                OutputFormat::Json => json_reads.extend(results.iter().map(json_row)),
                OutputFormat::Tsv => print_tsv_rows(&results, args.identity),
            }
            Ok(())
        },
    )?;
    info!("Classified {} reads from {}", total, args.reads.display());

    if verbose {
        eprintln!(
            "Matched {} of {} reads ({:.1}%)",
            summary.matched,
            summary.reads,
            summary.match_rate() * 100.0
        );
    }

    match format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Json => print_json_results(json_reads, &summary)?,
        OutputFormat::Tsv => {}
    }

    Ok(())
}

fn load_index(args: &ClassifyArgs) -> anyhow::Result<KmerIndex> {
    match (&args.index, &args.reference) {
        (Some(path), _) => {
            let index = KmerIndex::load(path)?;
            info!(
                "Loaded index of {} tags (k={}) from {}",
                index.references().len(),
                index.word_length(),
                path.display()
            );
            Ok(index)
        }
        (None, Some(reference)) => build_index(reference, &args.index_options),
        (None, None) => anyhow::bail!("Either --index or --reference is required"),
    }
}

fn identity(read: &SequenceRecord, matched: &TagMatch<'_>) -> Option<Identity> {
    match calc_identity(&read.sequence, matched.tag.as_bytes()) {
        Ok((aligned_length, identities)) => Some(Identity {
            aligned_length,
            identities,
            edit_distance: levenshtein_distance(&read.sequence, matched.tag.as_bytes()),
        }),
        Err(e) => {
            warn!("Cannot align read '{}': {}", read.name, e);
            None
        }
    }
}

fn print_text_rows(results: &[ReadResult<'_, '_>]) {
    for result in results {
        match &result.classification {
            Ok(Some(m)) => {
                print!(
                    "{}\t{} (id {}, {}/{} votes, {:?})",
                    result.read.name,
                    m.name,
                    m.tag_id,
                    m.votes,
                    m.windows,
                    m.confidence()
                );
                if let Some(identity) = result.identity {
                    print!(
                        "  identity {}/{}, edit distance {}",
                        identity.identities, identity.aligned_length, identity.edit_distance
                    );
                }
                println!();
            }
            Ok(None) => println!("{}\tno match", result.read.name),
            Err(e) => println!("{}\trejected ({e})", result.read.name),
        }
    }
}

fn print_text_summary(summary: &BatchSummary) {
    println!(
        "\nMatched {} of {} reads ({:.1}%), {} unmatched, {} rejected",
        summary.matched,
        summary.reads,
        summary.match_rate() * 100.0,
        summary.unmatched,
        summary.rejected
    );
}

fn json_row(result: &ReadResult<'_, '_>) -> serde_json::Value {
    let mut entry = match &result.classification {
        Ok(matched) => serde_json::json!({
            "read": result.read.name,
            "match": matched.as_ref().map(|m| serde_json::json!({
                "tag_id": m.tag_id,
                "name": m.name,
                "tag": m.tag,
                "votes": m.votes,
                "windows": m.windows,
                "confidence": m.confidence(),
            })),
        }),
        Err(e) => serde_json::json!({
            "read": result.read.name,
            "match": null,
            "error": e.to_string(),
        }),
    };
    if let Some(identity) = result.identity {
        entry["identity"] = serde_json::json!({
            "aligned_length": identity.aligned_length,
            "identities": identity.identities,
            "edit_distance": identity.edit_distance,
        });
    }
    entry
}

fn print_json_results(reads: Vec<serde_json::Value>, summary: &BatchSummary) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "summary": summary,
        "reads": reads,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_header(with_identity: bool) {
    let mut header = String::from("read\ttag_id\ttag_name\tvotes\twindows\tconfidence");
    if with_identity {
        header.push_str("\taligned_length\tidentities\tedit_distance");
    }
    println!("{header}");
}

fn print_tsv_rows(results: &[ReadResult<'_, '_>], with_identity: bool) {
    for result in results {
        let mut row = match &result.classification {
            Ok(Some(m)) => format!(
                "{}\t{}\t{}\t{}\t{}\t{:?}",
                result.read.name,
                m.tag_id,
                m.name,
                m.votes,
                m.windows,
                m.confidence()
            ),
            Ok(None) => format!("{}\t-\t-\t0\t-\t-", result.read.name),
            Err(_) => format!("{}\t-\t-\t0\t-\trejected", result.read.name),
        };
        if with_identity {
            match result.identity {
                Some(identity) => row.push_str(&format!(
                    "\t{}\t{}\t{}",
                    identity.aligned_length, identity.identities, identity.edit_distance
                )),
                None => row.push_str("\t-\t-\t-"),
            }
        }
        println!("{row}");
    }
}
