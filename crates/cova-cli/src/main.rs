//! Cova CLI
//!
//! Command-line interface for generating combinatorial test suites.

#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]

use clap::{Parser, Subcommand};
use cova_cli::{
    check_suite, export_suite, generate_suite, list_paths, load_suite, parse_output_format,
    render_suite,
};
use cova_report::{DEFAULT_FALSE_SYMBOL, DEFAULT_TRUE_SYMBOL};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "cova")]
#[command(about = "Perspective-driven combinatorial test case generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate test cases from a suite file
    Generate {
        /// Path to the suite YAML file
        #[arg(value_name = "SUITE")]
        suite: PathBuf,

        /// Output format (json, yaml, markdown)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write the rendering to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the suite file's export section
        #[arg(long)]
        no_export: bool,

        /// Mark for a selected level in the Markdown matrix
        #[arg(long, default_value = DEFAULT_TRUE_SYMBOL)]
        true_symbol: String,

        /// Mark for an unselected level in the Markdown matrix
        #[arg(long, default_value = DEFAULT_FALSE_SYMBOL)]
        false_symbol: String,
    },

    /// List the flattened factor paths and their levels
    Paths {
        /// Path to the suite YAML file
        #[arg(value_name = "SUITE")]
        suite: PathBuf,
    },

    /// Validate a suite without generating
    Check {
        /// Path to the suite YAML file
        #[arg(value_name = "SUITE")]
        suite: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            suite,
            format,
            output,
            no_export,
            true_symbol,
            false_symbol,
        } => {
            generate(
                &suite,
                &format,
                output.as_deref(),
                no_export,
                &true_symbol,
                &false_symbol,
            );
        }
        Commands::Paths { suite } => {
            let listing = load_suite(&suite).and_then(|file| list_paths(&file.suite));
            match listing {
                Ok(listing) => print!("{listing}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { suite } => {
            match load_suite(&suite).and_then(|file| check_suite(file.suite)) {
                Ok(report) => {
                    println!("Suite OK: {}", suite.display());
                    print!("{report}");
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn generate(
    path: &Path,
    format: &str,
    output: Option<&Path>,
    no_export: bool,
    true_symbol: &str,
    false_symbol: &str,
) {
    let format = match parse_output_format(format) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let file = match load_suite(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let export = file.export;

    let suite = match generate_suite(file.suite) {
        Ok(suite) => suite,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let rendered = match render_suite(&suite, format, true_symbol, false_symbol) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match output {
        Some(out) => {
            if let Err(e) = std::fs::write(out, &rendered) {
                eprintln!("Error writing {}: {e}", out.display());
                std::process::exit(1);
            }
            eprintln!("Generated {} test case(s) → {}", suite.len(), out.display());
        }
        None => println!("{rendered}"),
    }

    if no_export {
        return;
    }
    if let Some(options) = export {
        match export_suite(&suite, &options) {
            Ok(summary) => {
                for written in &summary.written {
                    eprintln!("Exported {}", written.display());
                }
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
