//! Configuration handling for newtex.
//! The configuration directory holds `config.yaml` next to the template tree
//! that every new project is copied from.

use crate::constants::{CONFIG_FILE, DEFAULT_DROPBOX};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keys that must be present and non-null in `config.yaml`.
pub const REQUIRED_KEYS: [&str; 4] = [
    "master_bib_file",
    "authors",
    "affiliations",
    "default_style",
];

/// User-level settings for scaffolding documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the master BibTeX file; may start with `~`.
    pub master_bib_file: String,
    pub authors: Vec<String>,
    /// One affiliation per author, same order.
    pub affiliations: Vec<String>,
    /// Bibliography style name used in `\bibliographystyle`.
    pub default_style: String,
    /// Root under which shared bare repositories are created.
    #[serde(default = "default_dropbox")]
    pub dropbox: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<NaiveDate>,
    /// Directory the configuration was loaded from; also the template tree.
    #[serde(skip)]
    pub template_dir: PathBuf,
}

fn default_dropbox() -> String {
    DEFAULT_DROPBOX.to_string()
}

impl Config {
    /// First author, used for naming and the document header.
    pub fn main_author(&self) -> Result<&str> {
        self.authors
            .first()
            .map(String::as_str)
            .ok_or_else(|| {
                Error::ConfigError("'authors' must list at least one author".to_string())
            })
    }

    /// Checks the invariants not expressible through serde.
    ///
    /// # Errors
    /// * `Error::ConfigError` if there are no authors
    /// * `Error::AuthorAffiliationMismatch` if the lists differ in length
    pub fn validate(&self) -> Result<()> {
        self.main_author()?;
        if self.authors.len() != self.affiliations.len() {
            return Err(Error::AuthorAffiliationMismatch {
                authors: self.authors.len(),
                affiliations: self.affiliations.len(),
            });
        }
        Ok(())
    }
}

/// Path of the configuration file inside `config_dir`.
pub fn config_file<P: AsRef<Path>>(config_dir: P) -> PathBuf {
    config_dir.as_ref().join(CONFIG_FILE)
}

/// Parses configuration content, checking required keys before deserializing.
///
/// # Arguments
/// * `content` - Raw YAML content
/// * `source` - Name used in error messages
///
/// # Errors
/// * `Error::MissingConfigKey` naming the first absent or null required key
/// * `Error::YamlError` if the content is not valid YAML or has wrong types
/// * `Error::AuthorAffiliationMismatch` / `Error::ConfigError` from [`Config::validate`]
pub fn parse_config(content: &str, source: &str) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
    let mapping = match raw {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => serde_yaml::Mapping::new(),
        _ => {
            return Err(Error::ConfigError(format!(
                "'{source}' must contain a mapping of settings"
            )));
        }
    };

    for key in REQUIRED_KEYS {
        match mapping.get(key) {
            None | Some(serde_yaml::Value::Null) => {
                return Err(Error::MissingConfigKey {
                    key: key.to_string(),
                    config_file: source.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    let config: Config = serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))?;
    config.validate()?;
    Ok(config)
}

/// Loads and validates `config.yaml` from the configuration directory.
///
/// # Returns
/// * `Result<Config>` - Configuration whose `template_dir` is `config_dir`
///
/// # Errors
/// * `Error::ConfigError` if the file does not exist
/// * Any error from [`parse_config`]
pub fn load_config<P: AsRef<Path>>(config_dir: P) -> Result<Config> {
    let config_dir = config_dir.as_ref();
    let config_path = config_file(config_dir);
    if !config_path.is_file() {
        return Err(Error::ConfigError(format!(
            "No configuration file found at '{}' (run with --reconfigure)",
            config_path.display()
        )));
    }

    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    let mut config = parse_config(&content, &config_path.display().to_string())?;
    config.template_dir = config_dir.to_path_buf();
    Ok(config)
}

/// Writes `config` to `config.yaml` in `config_dir`, creating the directory.
pub fn write_config<P: AsRef<Path>>(config_dir: P, config: &Config) -> Result<PathBuf> {
    let config_dir = config_dir.as_ref();
    std::fs::create_dir_all(config_dir)?;
    let config_path = config_file(config_dir);
    let content = serde_yaml::to_string(config)?;
    std::fs::write(&config_path, content)?;
    debug!("Wrote configuration to {}", config_path.display());
    Ok(config_path)
}
