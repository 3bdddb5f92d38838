//! Command-line interface implementation for newtex.
//! Provides argument parsing and help text formatting using clap.

use crate::document::DocType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for newtex.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "newtex: start a new LaTeX document from your template",
    long_about = None
)]
pub struct Args {
    /// Kind of document
    #[arg(long, value_enum, ignore_case = true)]
    pub doc_type: Option<DocType>,

    /// Directory in which the project directory is created
    #[arg(long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Short name used in the directory and file names
    #[arg(long)]
    pub short_name: Option<String>,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Directory holding config.yaml and the template tree
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Run the configuration wizard and exit
    #[arg(long)]
    pub reconfigure: bool,

    /// Create the project without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Remove LaTeX intermediate files
    Clean {
        /// Project directory to clean
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
