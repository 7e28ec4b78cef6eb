//! Binary entry point for the `template-push` command-line tool.
//!
//! The binary is a thin wrapper: arguments are parsed with `clap`, the
//! selected subcommand runs, and errors bubble up as `anyhow::Error` to be
//! reported with their full context chain. All planning and execution logic
//! lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
