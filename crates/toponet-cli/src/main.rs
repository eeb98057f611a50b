//! `toponet`: generate agent networks, synthesize their topologies and
//! prepare the labels as datasets.
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod error;
mod io;

use cli::{Cli, Command};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = dispatch(&cli) {
        eprintln!("{}", err.message());
        std::process::exit(err.exit_code());
    }
}

/// Logs to stderr. `RUST_LOG` wins over `--verbose` / `--quiet`.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Generate(args) => cmd::generate::run(args, &cli.format),
        Command::Synthesize { file, fallback } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::synthesize::run(&content, &file.label(), (*fallback).into(), &cli.format)
        }
        Command::Cycles { file } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::cycles::run(&content, &file.label(), &cli.format)
        }
        Command::Preprocess(args) => {
            let content = io::read_input(&args.file, cli.max_file_size)?;
            cmd::preprocess::run(args, &content, &cli.format)
        }
        Command::Version => cmd::version::run(&cli.format),
    }
}
