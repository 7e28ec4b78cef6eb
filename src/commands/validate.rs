//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a push
//! specification file without connecting to any instance.
//!
//! ## Functionality
//!
//! - **Specification Parsing**: Parses the specification file and validates
//!   its structure.
//! - **Pattern Validation**: Compiles the include patterns and the folder
//!   and configuration rename rules, reporting any invalid expression.
//!
//! This command is a safe, read-only operation that does not modify
//! anything anywhere.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use template_push::config;
use template_push::output::{emoji, OutputConfig};

/// Validate a push specification file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the push specification file to validate.
    #[arg(short, long, value_name = "FILE", default_value = "push-spec.json")]
    pub spec: PathBuf,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating specification: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.spec.display()
    );

    let spec = match config::from_file(&args.spec) {
        Ok(spec) => {
            println!(
                "{} Specification file parsed successfully",
                emoji(&out, "✅", "[OK]")
            );
            spec
        }
        Err(e) => {
            println!(
                "{} Specification parsing failed: {}",
                emoji(&out, "❌", "[ERR]"),
                e
            );
            return Err(anyhow::anyhow!("Specification parsing failed: {}", e));
        }
    };

    let compiled = match spec.compile() {
        Ok(compiled) => {
            println!("{} All patterns compile", emoji(&out, "✅", "[OK]"));
            compiled
        }
        Err(e) => {
            println!(
                "{} Pattern compilation failed: {}",
                emoji(&out, "❌", "[ERR]"),
                e
            );
            return Err(anyhow::anyhow!("Specification validation failed"));
        }
    };

    let mut has_warnings = false;

    println!("\n{} Specification Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Include patterns: {}", compiled.include_count());
    println!("   Folder rename rules: {}", compiled.folder_renames.len());
    println!(
        "   Configuration rename rules: {}",
        compiled.configuration_renames.len()
    );

    if compiled.include_count() == 0 {
        println!(
            "\n{} The specification has no include patterns, a push would match no templates",
            emoji(&out, "⚠️", "[WARN]")
        );
        has_warnings = true;
    }

    println!("\n{} Validation Result:", emoji(&out, "🎯", "[RESULT]"));

    if has_warnings && args.strict {
        println!(
            "{} Specification has warnings (strict mode enabled)",
            emoji(&out, "❌", "[ERR]")
        );
        return Err(anyhow::anyhow!(
            "Specification validation failed in strict mode"
        ));
    }

    if has_warnings {
        println!(
            "{} Specification is valid but has warnings",
            emoji(&out, "⚠️", "[WARN]")
        );
    } else {
        println!("{} Specification is valid", emoji(&out, "✅", "[OK]"));
    }

    Ok(())
}
