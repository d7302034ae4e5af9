//! CLI argument parsing for upriver
//!
//! Uses clap for argument parsing. Global flags cover store location
//! (`--db`, `--filter-db`), trace configuration (`--category`,
//! `--dataset-version`, `--config`), output (`--format`, `--quiet`)
//! and logging (`--verbose`, `--log-level`, `--log-json`).

pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parse::parse_format;
pub use upriver_core::format::OutputFormat;

/// Upriver - upstream supply-chain dependency tracer
#[derive(Parser, Debug)]
#[command(name = "upriver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the exchange database (SQLite)
    #[arg(long, global = true, env = "UPRIVER_DB")]
    pub db: Option<PathBuf>,

    /// Path to the process-category database used with --category
    #[arg(long, global = true, env = "UPRIVER_FILTER_DB")]
    pub filter_db: Option<PathBuf>,

    /// Restrict traversal to exchanges in this material category
    #[arg(long, global = true)]
    pub category: Option<String>,

    /// Dataset version to query
    #[arg(long, global = true)]
    pub dataset_version: Option<String>,

    /// Path to a TOML config file with trace defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human, json, markdown)
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create empty exchange and category databases
    Init {
        /// Also create the category database at --filter-db
        #[arg(long)]
        with_filter: bool,
    },

    /// Build the full upstream dependency tree for a process
    Tree {
        /// Root process id (falls back to the config default)
        process_id: Option<String>,

        /// Keep every parallel exchange per provider instead of one
        #[arg(long)]
        full: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Follow the max-weight upstream chain from a process
    Chain {
        /// Root process id (falls back to the config default)
        process_id: Option<String>,

        /// Product flow id shown in report headers
        #[arg(long)]
        flow: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Compute structural statistics over the upstream tree
    Stats {
        /// Root process id (falls back to the config default)
        process_id: Option<String>,

        /// Analyze the full tree (all parallel exchanges) instead of one per provider
        #[arg(long)]
        full: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Trace many roots listed in a file, one report per root
    Batch {
        /// Roots file: one `process_id[,flow_id][,label]` per line, `#` comments
        roots_file: PathBuf,

        /// Directory for the per-root reports
        #[arg(long, short, default_value = "upriver-out")]
        output_dir: PathBuf,

        /// Build max-weight chains instead of trees
        #[arg(long)]
        chain: bool,

        /// Keep every parallel exchange per provider (tree mode only)
        #[arg(long)]
        full: bool,
    },
}
