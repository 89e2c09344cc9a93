//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Codebook: check and clean metadata maps against a data dictionary
#[derive(Parser)]
#[command(name = "codebook")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, global = true, default_value = "compact")]
    pub log_format: LogFormatChoice,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every column of a map against its dictionary entry
    Validate {
        /// Path to the metadata map (CSV/TSV)
        #[arg(value_name = "MAP")]
        map: PathBuf,

        /// Path to the data dictionary (JSON)
        #[arg(short, long, value_name = "DICT")]
        dictionary: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run each column's cleaning steps and write the cleaned map
    Clean {
        /// Path to the metadata map (CSV/TSV)
        #[arg(value_name = "MAP")]
        map: PathBuf,

        /// Path to the data dictionary (JSON)
        #[arg(short, long, value_name = "DICT")]
        dictionary: PathBuf,

        /// Output path for the cleaned map (default: <map>.clean.tsv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for the provenance log (default: <map>.provenance.tsv)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Summarize a provenance log written by `clean`
    Log {
        /// Path to the provenance log (TSV)
        #[arg(value_name = "LOG")]
        file: PathBuf,

        /// Only show records for this column
        #[arg(short, long)]
        column: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatChoice {
    /// Multi-line, human-readable
    Pretty,
    /// One line per event
    Compact,
    /// Newline-delimited JSON
    Json,
}
