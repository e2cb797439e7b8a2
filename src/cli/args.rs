//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Dog agility record book: venue configurations, run scoring, and
/// document migration
#[derive(Parser, Debug)]
#[command(name = "arbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Record book file (default: from config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a record book and report anything suspicious
    Check,

    /// Summarize the record book contents
    Info,

    /// Show earned title points per venue
    Points {
        /// Limit to one dog by call name
        #[arg(long)]
        dog: Option<String>,
    },

    /// Merge a venue configuration update into the record book
    Update {
        /// Configuration file to merge
        #[arg(value_hint = ValueHint::FilePath)]
        config: PathBuf,

        /// Report changes without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Write the result here instead of over the record book
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config path
    Path,
}
