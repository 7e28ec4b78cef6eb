//! # Completions Command Implementation
//!
//! This module implements the `completions` subcommand. The scripts are
//! generated with `clap_complete` and written to stdout, so they can be
//! redirected into the shell's completion directory:
//!
//! ```bash
//! template-push completions bash > ~/.local/share/bash-completion/completions/template-push
//! template-push completions zsh > ~/.zfunc/_template-push
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate the completion script for the requested shell on stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "template-push", &mut io::stdout());
    Ok(())
}
