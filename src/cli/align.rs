//! Align command - Smith-Waterman local alignment of two sequences.

use clap::Args;

use crate::align::{levenshtein_distance, AlignmentResult, ScoringScheme, SmithWaterman};
use crate::cli::OutputFormat;

/// Arguments for the align command
#[derive(Args)]
pub struct AlignArgs {
    /// First sequence (rows); A, C, G, T, with N or X for masked bases
    #[arg(required = true)]
    pub seq_a: String,

    /// Second sequence (columns)
    #[arg(required = true)]
    pub seq_b: String,

    /// Score added for each identical column
    #[arg(long, default_value = "2")]
    pub match_reward: i32,

    /// Score subtracted for each mismatched column
    #[arg(long, default_value = "2")]
    pub mismatch_penalty: i32,

    /// Score subtracted for each gap column
    #[arg(long, default_value = "1")]
    pub gap_cost: i32,
}

/// Execute the align command
///
/// # Errors
///
/// Returns an error if the scoring scheme is invalid or either sequence holds
/// a symbol the aligner does not accept.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let scheme = ScoringScheme::new(args.match_reward, args.mismatch_penalty, args.gap_cost)?;
    if verbose {
        eprintln!(
            "Scoring: match +{}, mismatch -{}, gap -{}",
            scheme.match_reward(),
            scheme.mismatch_penalty(),
            scheme.gap_cost()
        );
    }

    let seq_a = args.seq_a.to_ascii_uppercase();
    let seq_b = args.seq_b.to_ascii_uppercase();

    let mut aligner = SmithWaterman::with_scoring_scheme(scheme);
    aligner
        .load_sequences(seq_a.as_bytes(), seq_b.as_bytes())
        .map_err(|e| anyhow::anyhow!("Cannot align sequences: {e}"))?;
    let alignment = aligner.alignment()?;
    let edit_distance = levenshtein_distance(seq_a.as_bytes(), seq_b.as_bytes());

    match format {
        OutputFormat::Text => print_text_result(&alignment, edit_distance),
        OutputFormat::Json => print_json_result(&alignment, edit_distance)?,
        OutputFormat::Tsv => print_tsv_result(&alignment, edit_distance),
    }

    Ok(())
}

fn print_text_result(alignment: &AlignmentResult, edit_distance: usize) {
    println!("{alignment}");
    println!(
        "Offsets: A {}..{}, B {}..{}",
        alignment.row_start, alignment.row_end, alignment.col_start, alignment.col_end
    );
    println!(
        "Identity: {}/{} columns",
        alignment.identities(),
        alignment.columns()
    );
    println!("Edit distance: {edit_distance}");
}

fn print_json_result(alignment: &AlignmentResult, edit_distance: usize) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "alignment": alignment,
        "columns": alignment.columns(),
        "identities": alignment.identities(),
        "edit_distance": edit_distance,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(alignment: &AlignmentResult, edit_distance: usize) {
    println!("score\trow_start\tcol_start\trow_end\tcol_end\tcolumns\tidentities\tedit_distance");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        alignment.score,
        alignment.row_start,
        alignment.col_start,
        alignment.row_end,
        alignment.col_end,
        alignment.columns(),
        alignment.identities(),
        edit_distance
    );
}
