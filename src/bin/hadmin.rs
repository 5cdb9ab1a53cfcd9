//! # hadmin - administer hieronymus versioning data
//!
//! ## Usage
//! ```bash
//! # Restore todo.txt to the version closest to 14 January 2011, 13:45
//! hadmin --restore --date 14-01-2011 --time 13.45.00 notes/todo.txt
//!
//! # Same, for a hieronymus build that stores xdelta patches
//! hadmin -r -d 14-01-2011 -t 13.45.00 --xdelta notes/todo.txt
//!
//! # Only show what would be run
//! hadmin -r -d 14-01-2011 --dry-run notes/todo.txt
//! ```

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use humantime::format_duration;
use std::time::Duration;
use hadmin::restore::{DEFAULT_DATE, DEFAULT_TIME};
use hadmin::{HadminError, PatchTool, RestoreConfig, RestoreOutcome, RestorePlan, Restorer};
use tracing_subscriber::EnvFilter;

/// hadmin - restore files versioned by hieronymus
#[derive(Parser)]
#[command(name = "hadmin")]
#[command(version)]
#[command(about = "Restore files versioned by hieronymus to a point in time")]
#[command(override_usage = "hadmin [OPTIONS] <PATH>")]
struct Cli {
    /// List all versioning information for PATH
    #[arg(short, long)]
    list: bool,

    /// Restore a file to a certain point in time
    #[arg(short, long)]
    restore: bool,

    /// The date to restore to in dd-mm-YYYY format
    #[arg(short, long, value_name = "dd-mm-YYYY")]
    date: Option<String>,

    /// The time to restore to in hh.mm.ss format
    #[arg(short, long, value_name = "hh.mm.ss")]
    time: Option<String>,

    /// Use xdelta for restoring files. Only use this if hieronymus was compiled with -D_XDELTA
    #[arg(long)]
    xdelta: bool,

    /// Program to run instead of `patch` or `xdelta3`
    #[arg(long, value_name = "PROGRAM")]
    program: Option<String>,

    /// Resolve the snapshot and patch but do not apply them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// File to operate on
    path: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        let message = match e.downcast_ref::<HadminError>() {
            Some(err) => err.user_message(),
            None => format!("{:#}", e),
        };
        eprintln!("{}: {}", "Error".red().bold(), message);
        std::process::exit(1);
    }
}

/// Main command runner
fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(path) = cli.path.clone() else {
        print_help()?;
        return Ok(());
    };

    if cli.list {
        println!("Unimplemented!");
        return Ok(());
    }

    if cli.restore {
        if cli.date.is_none() && cli.time.is_none() {
            println!("Please provide a date and time!\n");
            print_help()?;
            return Ok(());
        }
        return cmd_restore(cli, path);
    }

    print_help()?;
    Ok(())
}

fn print_help() -> anyhow::Result<()> {
    Cli::command().print_help().context("failed to print help")?;
    println!();
    Ok(())
}

/// Restore a file from its `.version` directory
fn cmd_restore(cli: Cli, path: String) -> anyhow::Result<()> {
    let date = cli.date.unwrap_or_else(|| DEFAULT_DATE.to_string());
    let time = cli.time.unwrap_or_else(|| DEFAULT_TIME.to_string());

    let config = RestoreConfig::builder(path.as_str())
        .date(date.as_str())
        .time(time.as_str())
        .tool(PatchTool::from_xdelta_flag(cli.xdelta))
        .program(cli.program)
        .dry_run(cli.dry_run)
        .build()?;

    if !cli.json {
        println!(
            "{} {} to snapshot closest to {} at {}",
            "Restoring".blue().bold(),
            path.cyan(),
            date.yellow(),
            time.yellow()
        );
    }

    let restorer = Restorer::new(config);
    let plan = restorer.plan()?;
    if !cli.json {
        print_plan(&plan);
    }

    let outcome = restorer.apply(plan)?;
    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?;
        println!("{}", json);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_plan(plan: &RestorePlan) {
    println!("  Snapshot: {}", plan.snapshot.name.cyan());
    println!("  Patch: {}", plan.patch.name.cyan());
    println!("  Command: {}", plan.command.to_string().dimmed());
}

fn print_outcome(outcome: &RestoreOutcome) {
    match &outcome.output {
        Some(output) => {
            if !output.stdout.is_empty() {
                println!("{}", output.stdout);
            }
            println!(
                "{} Restored {} in {}",
                "✓".green().bold(),
                outcome.plan.target.cyan(),
                format_duration(Duration::from_millis(output.duration_ms))
            );
        }
        None => {
            println!("{} Dry run, nothing was changed", "!".yellow().bold());
        }
    }
}
