//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use crate::config::{ColorOption, OutputFormat};

/// Formrules CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "formrules")]
#[command(about = "Validate form values and emit the matching client-side checks")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (overrides formrules.toml)
    #[arg(long, global = true)]
    pub color: Option<ColorOption>,

    /// Configuration file (defaults to ./formrules.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available formrules subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate values against a rule
    Validate {
        /// Rule name
        rule: String,

        /// Submitted values; more than one is validated element by element
        #[arg(required = true)]
        values: Vec<String>,

        /// Rule-specific format (pattern, length bounds, operator, ...)
        #[arg(long)]
        format: Option<String>,

        /// Hand all values to the rule as one unit
        #[arg(long)]
        joint: bool,

        /// Output format (overrides formrules.toml)
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },

    /// Emit the client-side check for a rule applied to an element
    Script {
        /// JSON file holding one element descriptor or an array of them
        #[arg(long)]
        element: PathBuf,

        /// Rule name
        #[arg(long)]
        rule: String,

        /// Message appended when the check fails
        #[arg(long)]
        message: String,

        /// Element name used for addressing and the error flag
        /// (defaults to the first descriptor's name)
        #[arg(long)]
        name: Option<String>,

        /// Group the rule is applied through; shares its error flag
        #[arg(long)]
        group: Option<String>,

        /// Restore the element's default value when the check fails
        #[arg(long)]
        reset: bool,

        /// Minimum number of values that must satisfy the rule
        #[arg(long)]
        howmany: Option<usize>,

        /// Rule-specific format
        #[arg(long)]
        format: Option<String>,
    },

    /// List bound rule names and their kinds
    List {
        /// Output format (overrides formrules.toml)
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },
}
