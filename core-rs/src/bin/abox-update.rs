//! abox-update - reconcile instance data with a new ontology version
//!
//! Command-line entry point around `abox_update::run_upgrade`

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use abox_update::{run_upgrade, ChangeLists, ProcessSummary, UpdateSettings};

#[derive(Parser)]
#[command(name = "abox-update")]
#[command(version)]
#[command(about = "Align a knowledge base ABox with a new ontology version", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the class and property change lists to the ABox
    Run {
        /// Upgrade settings file (YAML)
        #[arg(long, short)]
        config: PathBuf,
        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Validate settings and change lists without touching any data
    Check {
        /// Upgrade settings file (YAML)
        #[arg(long, short)]
        config: PathBuf,
    },
}

fn print_summary(label: &str, summary: &ProcessSummary) {
    let failed = if summary.failed > 0 {
        summary.failed.to_string().red().bold()
    } else {
        summary.failed.to_string().green()
    };
    println!(
        "  {:<10} applied {}  advisories {}  unchanged {}  failed {}",
        label, summary.applied, summary.advisories, summary.unchanged, failed
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { config, json } => {
            let settings = UpdateSettings::load(&config)
                .with_context(|| format!("loading settings from {}", config.display()))?;
            let report = run_upgrade(&settings).context("upgrade run failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", "✓ Knowledge base update finished".green());
                print_summary("classes", &report.classes);
                print_summary("properties", &report.properties);
                println!("  additions   {} -> {}", report.additions, report.additions_path.display());
                println!("  retractions {} -> {}", report.retractions, report.retractions_path.display());
                println!("  abox        {}", report.abox_path.display());
                if report.errors > 0 {
                    println!(
                        "{}",
                        format!("⚠ {} errors logged; manual review required", report.errors)
                            .yellow()
                    );
                }
            }
        }

        Commands::Check { config } => {
            let settings = UpdateSettings::load(&config)
                .with_context(|| format!("loading settings from {}", config.display()))?;
            let changes = ChangeLists::load(&settings).context("loading change lists")?;
            let missing_kind = changes
                .classes
                .iter()
                .chain(changes.properties.iter())
                .filter(|c| c.kind.is_none())
                .count();

            println!("{}", "✓ Settings valid".green());
            println!("  class changes    {}", changes.classes.len());
            println!("  property changes {}", changes.properties.len());
            if missing_kind > 0 {
                println!(
                    "{}",
                    format!("⚠ {} changes have a missing or unknown kind and will be skipped", missing_kind)
                        .yellow()
                );
            }
        }
    }

    Ok(())
}
