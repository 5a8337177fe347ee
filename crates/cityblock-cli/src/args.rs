//! Command-line argument definitions for the `cityblock` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Assemble, decode and encode city block blueprints
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a city block blueprint from a recipe file
    Assemble {
        /// Recipe file (RON, TOML or JSON)
        recipe: PathBuf,

        /// Directory with custom templates instead of the built-in set
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Write the exchange string here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an exchange string as pretty JSON
    Decode {
        /// Exchange string, a file containing one, or `-` for stdin
        input: String,
    },

    /// Print the exchange string of a JSON blueprint document
    Encode {
        /// JSON file holding `{"blueprint": {...}}`
        json: PathBuf,
    },
}
