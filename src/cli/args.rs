//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Turn flat document text into a hierarchical JSON tree driven by declarative level patterns
#[derive(Parser, Debug)]
#[command(name = "doctree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for the local .doctree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Structure one document and print JSON
    Structure {
        /// Text or markdown file, "-" for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Hierarchy definition (.toml or .json)
        #[arg(short = 'H', long, value_hint = ValueHint::FilePath)]
        hierarchy: Option<PathBuf>,
        /// Write JSON to this file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Wrap output under the hierarchy's root name
        #[arg(long)]
        wrap: bool,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Structure every document in a directory (in parallel)
    Batch {
        /// Directory to scan recursively
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        /// Hierarchy definition (.toml or .json)
        #[arg(short = 'H', long, value_hint = ValueHint::FilePath)]
        hierarchy: Option<PathBuf>,
        /// Write JSON files here (default: next to each document)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
    },

    /// Show document structure as tree
    Tree {
        /// Text or markdown file, "-" for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Hierarchy definition (.toml or .json)
        #[arg(short = 'H', long, value_hint = ValueHint::FilePath)]
        hierarchy: Option<PathBuf>,
    },

    /// Validate a hierarchy definition and list its levels
    Check {
        /// Hierarchy definition (.toml or .json)
        #[arg(short = 'H', long, value_hint = ValueHint::FilePath)]
        hierarchy: Option<PathBuf>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,

    /// Write a template config file
    Init {
        /// Create the global config instead of the project one
        #[arg(short, long)]
        global: bool,
    },

    /// Show config file locations
    Path,
}
