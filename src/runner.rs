//! Request collection and confirmation.
//! Fills in whatever the command line left out, asks before writing anything
//! and hands the validated request to the [`Scaffolder`].

use crate::cli::Args;
use crate::config::{config_file, load_config, Config};
use crate::constants::DEFAULT_CONFIG_DIR;
use crate::document::{DocType, DocumentDescriptor};
use crate::error::{Error, Result};
use crate::git::ProcessRunner;
use crate::paths::{make_absolute, resolve_path};
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;
use crate::scaffold::{ProjectDirectory, Scaffolder};
use crate::setup::configure;
use chrono::NaiveDate;
use clap::ValueEnum;
use log::debug;
use std::path::{Path, PathBuf};

/// `--config-dir`, or `~/.newtexrc` when it is not given.
pub fn get_config_dir(args: &Args) -> Result<PathBuf> {
    match &args.config_dir {
        Some(dir) => make_absolute(dir),
        None => resolve_path(DEFAULT_CONFIG_DIR),
    }
}

/// Loads the configuration, offering to run the setup wizard when none exists.
///
/// # Errors
/// * `Error::Cancelled` if the user declines the setup
pub fn get_config(prompt: &dyn Prompter, config_dir: &Path, today: NaiveDate) -> Result<Config> {
    if config_file(config_dir).is_file() {
        return load_config(config_dir);
    }

    let setup = prompt.confirm(
        false,
        format!(
            "No configuration found in '{}'. Set it up now?",
            config_dir.display()
        ),
    )?;
    if !setup {
        return Err(Error::Cancelled);
    }
    configure(prompt, config_dir, None, today)
}

/// Builds the document descriptor, asking for any detail missing from `args`.
pub fn get_document(
    prompt: &dyn Prompter,
    args: &Args,
    today: NaiveDate,
) -> Result<DocumentDescriptor> {
    let doc_type = match args.doc_type {
        Some(doc_type) => doc_type,
        None => {
            let variants = DocType::value_variants();
            let items: Vec<String> = variants.iter().map(|v| v.to_string()).collect();
            let index = prompt.select("Document type".to_string(), &items, 0)?;
            *variants
                .get(index)
                .ok_or_else(|| Error::ValidationError(format!("no document type #{index}")))?
        }
    };
    let short_name = match &args.short_name {
        Some(short_name) => short_name.clone(),
        None => prompt.input("Short name".to_string(), None, false)?,
    };
    let title = match &args.title {
        Some(title) => title.clone(),
        None => prompt.input("Title".to_string(), None, false)?,
    };

    DocumentDescriptor::new(doc_type, short_name, title, today)
}

/// `--destination`, or the directory the user names (default: the current one).
pub fn get_destination(prompt: &dyn Prompter, args: &Args) -> Result<PathBuf> {
    match &args.destination {
        Some(dir) => make_absolute(dir),
        None => {
            let answer = prompt.input(
                "Destination directory".to_string(),
                Some(".".to_string()),
                false,
            )?;
            resolve_path(answer)
        }
    }
}

/// Collects the request, confirms it and scaffolds the project.
///
/// Nothing is written before the user confirms, except the configuration
/// when the first-run setup is accepted.
///
/// # Errors
/// * `Error::Cancelled` if the user declines the setup or the final confirmation
/// * Any error from [`Scaffolder::plan`] or [`Scaffolder::create_document`]
pub fn create_project(
    args: &Args,
    prompt: &dyn Prompter,
    engine: &dyn TemplateRenderer,
    runner: &dyn ProcessRunner,
    today: NaiveDate,
) -> Result<ProjectDirectory> {
    let config_dir = get_config_dir(args)?;
    let config = get_config(prompt, &config_dir, today)?;
    let document = get_document(prompt, args, today)?;
    let destination = get_destination(prompt, args)?;

    let scaffolder = Scaffolder::new(engine, runner);
    let plan = scaffolder.plan(&config, &document, &destination)?;
    debug!("Planned project: {plan:?}");
    if !prompt.confirm(args.yes, format!("Create '{}'?", plan.project_dir.display()))? {
        return Err(Error::Cancelled);
    }

    scaffolder.create_document(&config, &document, &destination)
}
