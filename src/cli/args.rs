//! Defines the command-line arguments and subcommands for the deck CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "deck",
    version,
    about = "Parse, check and format deck language sources."
)]
pub struct DeckArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Report every syntax node built and torn down on stderr.
    #[arg(long, global = true)]
    pub trace: bool,

    /// Maximum nesting of expressions [default: 128].
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a file and report whether it is a complete definition.
    Parse {
        /// The path to the deck source file.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the canonical form of a file.
    Format {
        /// The path to the deck source file to format.
        #[arg(required = true)]
        file: PathBuf,
        /// Do not print; show a diff and fail if the file is not canonical.
        #[arg(long, conflicts_with = "structural")]
        check: bool,
        /// Print the structural debugging layout instead.
        #[arg(long)]
        structural: bool,
    },
    /// Show the Abstract Syntax Tree (AST) for a file.
    Ast {
        /// The path to the deck source file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Serialization format.
        #[arg(long, value_enum, default_value_t = AstFormat::Json)]
        format: AstFormat,
    },
    /// Parse every `.deck` file under a directory.
    Check {
        /// A directory to search, or a single file.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AstFormat {
    Json,
    Yaml,
}
