//! # Push Command Implementation
//!
//! This module implements the `push` subcommand, which runs the full
//! planning pipeline against a pair of instances and prints the resulting
//! report:
//!
//! 1. Discover matching templates on the local instance
//! 2. Apply folder and configuration renamings
//! 3. Resolve remote folders, templates and configurations
//! 4. Filter out what cannot or need not be imported
//! 5. Order imports so referenced templates go first
//! 6. Import the templates (only with `--execute`)
//!
//! Without `--execute` the command is a dry run: it connects to both
//! instances, plans the push and reports the plan without importing
//! anything.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use template_push::config;
use template_push::http::ConnectionDetails;
use template_push::local::HttpLocalCatalog;
use template_push::model::PushReport;
use template_push::output::{emoji, OutputConfig};
use template_push::phases::orchestrator;
use template_push::remote::HttpRemoteClient;

/// Arguments for the push command
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Path to the push specification file
    #[arg(short, long, value_name = "FILE", default_value = "push-spec.json")]
    pub spec: PathBuf,

    /// Base URL of the local instance templates are read from
    #[arg(long, value_name = "URL", env = "TEMPLATE_PUSH_LOCAL_URL")]
    pub local_url: String,

    /// Username for the local instance
    #[arg(long, value_name = "USER", env = "TEMPLATE_PUSH_LOCAL_USERNAME")]
    pub local_username: String,

    /// Password for the local instance
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "TEMPLATE_PUSH_LOCAL_PASSWORD",
        hide_env_values = true
    )]
    pub local_password: String,

    /// Base URL of the remote instance templates are imported into
    #[arg(long, value_name = "URL", env = "TEMPLATE_PUSH_REMOTE_URL")]
    pub remote_url: String,

    /// Username for the remote instance
    #[arg(long, value_name = "USER", env = "TEMPLATE_PUSH_REMOTE_USERNAME")]
    pub remote_username: String,

    /// Password for the remote instance
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "TEMPLATE_PUSH_REMOTE_PASSWORD",
        hide_env_values = true
    )]
    pub remote_password: String,

    /// Execute the plan instead of only reporting it
    #[arg(long)]
    pub execute: bool,

    /// Print the report as JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// Execute the `push` command.
pub fn execute(args: PushArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let spec = config::from_file(&args.spec).with_context(|| {
        format!(
            "cannot load the push specification from {}",
            args.spec.display()
        )
    })?;

    let local = HttpLocalCatalog::connect(&ConnectionDetails {
        url: args.local_url.clone(),
        username: args.local_username.clone(),
        password: args.local_password.clone(),
    })?;
    let remote = HttpRemoteClient::connect(&ConnectionDetails {
        url: args.remote_url.clone(),
        username: args.remote_username.clone(),
        password: args.remote_password.clone(),
    })?;

    let dry_run = !args.execute;
    let report = orchestrator::execute_push(&local, &remote, &spec, dry_run)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &out, dry_run);
    }

    if !report.errors.is_empty() {
        anyhow::bail!("The push finished with {} errors", report.errors.len());
    }
    Ok(())
}

fn print_report(report: &PushReport, out: &OutputConfig, dry_run: bool) {
    if dry_run {
        println!(
            "{} Plan of the template push (dry run)",
            emoji(out, "🚀", "[PLAN]")
        );
    } else {
        println!("{} Result of the template push", emoji(out, "🚀", "[PUSH]"));
    }

    if !report.actions.is_empty() {
        println!("\n{} Actions:", emoji(out, "📋", "[ACTIONS]"));
        for action in &report.actions {
            println!("   {}", action);
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{} Warnings:", emoji(out, "⚠️", "[WARN]"));
        for warning in &report.warnings {
            println!("   {}", warning);
        }
    }

    if !report.errors.is_empty() {
        println!("\n{} Errors:", emoji(out, "❌", "[ERR]"));
        for error in &report.errors {
            println!("   {}", error);
        }
    }

    let stats = &report.stats;
    println!("\n{} Summary:", emoji(out, "📊", "[INFO]"));
    println!("   Matched local templates: {}", stats.n_matched_templates);
    println!(
        "   With an existing remote folder: {}",
        stats.n_with_remote_folder
    );
    println!(
        "   Not existing remotely yet: {}",
        stats.n_not_existing_remotely
    );
    if let Some(imported) = stats.n_imported {
        println!("   Imported: {}", imported);
    }
    if let Some(failed) = stats.n_failed_import {
        println!("   Failed to import: {}", failed);
    }
}
