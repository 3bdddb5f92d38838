//! Error handling for the newtex application.
//! Defines the crate-wide error type and result alias used by every module.

use std::io;
use thiserror::Error;

/// Custom error types for newtex operations.
///
/// Every failure is surfaced to the top-level invocation; nothing is retried
/// and nothing already written to disk is rolled back.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors raised while parsing or writing YAML configuration
    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// Represents errors that occur during configuration loading
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// A required configuration key is absent or null
    #[error(
        "Configuration error: required key '{key}' is missing or null in '{config_file}'."
    )]
    MissingConfigKey { key: String, config_file: String },

    /// Authors and affiliations are paired positionally and must line up
    #[error(
        "Configuration error: {authors} author(s) but {affiliations} affiliation(s); \
         every author needs exactly one affiliation."
    )]
    AuthorAffiliationMismatch { authors: usize, affiliations: usize },

    /// A placeholder in a template has no value in the substitution context
    #[error("Template error: no value for placeholder '${name}'.")]
    MissingPlaceholderValue { name: String },

    /// Represents validation failures in user input or data
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// The project directory or its bare mirror is already on disk
    #[error(
        "Output directory '{output_dir}' already exists. Remove it or pick another short name."
    )]
    OutputDirectoryExistsError { output_dir: String },

    /// The `git` executable could not be started
    #[error(
        "git is not on your PATH. \
         Install git and make sure the 'git' command works from this shell."
    )]
    GitNotFound,

    /// `user.name` or `user.email` is not set in the git configuration
    #[error(
        "Please set up your name and email address in git by running,\n\n    \
         git config --global user.name \"YOUR NAME\"\n    \
         git config --global user.email \"YOUR EMAIL\"\n"
    )]
    GitIdentityMissing,

    /// A git invocation exited with a non-zero status
    #[error("Git error: '{command}' failed: {stderr}")]
    GitCommandError { command: String, stderr: String },

    /// Represents failures reading interactive input
    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),

    /// Represents errors while walking the template tree
    #[error("Directory traversal error: {0}.")]
    WalkDirError(#[from] walkdir::Error),

    /// Represents an invalid intermediate-file pattern
    #[error("Glob error: {0}.")]
    GlobError(#[from] globset::Error),

    /// The user declined a confirmation prompt
    #[error("Aborted.")]
    Cancelled,
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
