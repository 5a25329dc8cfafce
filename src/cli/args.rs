//! Defines the command-line arguments and subcommands for the Skein CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::syntax::DEFAULT_MAX_NESTING_DEPTH;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "skein",
    version,
    about = "Parse and check knot-and-stitch narrative scripts."
)]
pub struct SkeinArgs {
    /// More log output on stderr (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// How deep inline logic and expressions may nest.
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH, global = true)]
    pub max_nesting_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a script and print its syntax tree.
    Parse {
        /// The path to the script file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// How to print the tree.
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },
    /// Check scripts for syntax errors without printing trees.
    Check {
        /// Script files, or directories searched for `.ink` files.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented, one node per line.
    Tree,
    /// The serialized AST.
    Json,
}
