mod cli;
mod commands;
mod discovery;
mod paper;
mod pdf;
mod tally;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use env_logger::{Env, Target};
use pdf::group::OutputDir;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stdout)
        .format_timestamp(None)
        .init();

    run(&cli)
}

fn version_line() -> String {
    format!("pdfsort {}", env!("CARGO_PKG_VERSION"))
}

fn run(cli: &Cli) -> Result<()> {
    if cli.version {
        println!("{}", version_line());
        return Ok(());
    }

    if !(cli.table || cli.json || cli.write) {
        log::info!("Nothing to do; pass --table, --json or --write");
        return Ok(());
    }

    let source = std::path::absolute(&cli.directory)
        .with_context(|| format!("Invalid directory: {}", cli.directory.display()))?;
    let mut output = OutputDir::for_source(&source);

    let files = discovery::discover(&source, Some(output.path()))?;
    let collection = pdf::collect(&files)?;

    if cli.table {
        commands::table::run(&collection);
    }
    if cli.json {
        commands::json::run(&source, &collection)?;
    }
    if cli.write {
        let options = commands::write::WriteOptions {
            limit: cli.page_limit(),
        };
        commands::write::run(&collection, &options, &mut output)?;
    }

    Ok(())
}
