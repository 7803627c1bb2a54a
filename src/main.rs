use clap::Parser;
use tracing_subscriber::EnvFilter;

mod align;
mod cli;
mod core;
mod index;
mod matching;
mod parsing;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("tagmatch=debug,info")
    } else {
        EnvFilter::new("tagmatch=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Index(args) => {
            cli::index::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Classify(args) => {
            cli::classify::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
