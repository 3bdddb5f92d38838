//! newtex scaffolds LaTeX manuscript projects from a personal template tree:
//! it copies the template, fills in author and title metadata, places the
//! master bibliography and links the result to a shared bare git repository.

/// Removal of LaTeX intermediate files
pub mod clean;

/// Command-line interface module for the newtex application
pub mod cli;

/// Configuration loading and validation (`config.yaml`)
pub mod config;

pub mod constants;

/// Document descriptor and naming convention
pub mod document;

/// Error types and handling for the newtex application
pub mod error;

/// Typed git commands and the process runner seam
pub mod git;

/// Home-directory expansion and absolute paths
pub mod paths;

/// User input and interaction handling
pub mod prompt;

/// `$placeholder` substitution
pub mod renderer;

/// Request collection, confirmation and project creation
pub mod runner;

/// Core scaffolding pipeline
pub mod scaffold;

/// Configuration wizard and starter template
pub mod setup;
