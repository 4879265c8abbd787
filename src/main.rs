mod cli;
mod commands;
mod error;
mod extract;
mod manifest;
mod outline;
mod page_plan;
mod pdf;
mod selection;
mod slug;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        anyhow::bail!("file not found: {}", cli.input.display());
    }

    if cli.generate_config {
        return commands::generate::run(&cli.input);
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    commands::split::run(&commands::split::SplitArgs {
        manifest: &cli.input,
        root: &root,
        output_dir: cli.output_dir.as_deref(),
        dry_run: cli.dry_run,
        chapters: &cli.chapters,
    })?;

    Ok(())
}
