//! First-run setup: asks for the user's details, writes `config.yaml` and
//! installs a starter template tree next to it.

use crate::config::{write_config, Config};
use crate::constants::{
    DEFAULT_DROPBOX, DOCUMENT_TEMPLATE, GITIGNORE_TEMPLATE, SCRIPT_TEMPLATE,
};
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use chrono::NaiveDate;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Answer to the author prompt that ends the list even when a previous
/// author is offered as the default.
pub const END_OF_AUTHORS: &str = "-";

pub const DEFAULT_GITIGNORE: &str = r"# LaTeX working files
*.aux
*.bak
*.bbl
*.blg
*.dvi
*.fgx
*.log
*.out
*.pdf
*.synctex.gz
*.sav
*.spl
*.tbx
*.vdx

# latexmk
*.fdb_latexmk
*.fls

*.mp
*.top
*.tui

# MATLAB, Mathematica and Illustrator
**.asv
**.m~
**.mat
**.nb
**.ai

# Word
**.doc

# OS and sync clutter
**.DS_Store
**.dropbox
Icon?
**.lnk
";

pub const DEFAULT_DOCUMENT: &str = r"%  $title
%  Created by $main_author $date

\documentclass[aps,prl,twocolumn,citeautoscript,superscriptaddress,nofootinbib,floatfix]{revtex4-2}

\usepackage{siunitx}
\usepackage{graphicx}
\usepackage{amsmath}
\usepackage{bm}
\usepackage[colorlinks=true,citecolor=blue,linkcolor=blue,urlcolor=blue]{hyperref}

\newcommand{\figloc}[1]{./figs/#1}

\begin{document}

\title{$title}
$author_affiliation_block

\begin{abstract}
    This is the abstract.
\end{abstract}

\date{\today}
\maketitle

\section{Introduction}
This is the body.

\bibliographystyle{styles/$default_style}
\bibliography{bib/$default_bib}

\end{document}
";

pub const DEFAULT_SCRIPT: &str = r"MASTER_BIB = $master_bib_file

.PHONY: help cpbib clean

help:
	@echo 'cpbib    copy the master bibliography into bib/'
	@echo 'clean    remove LaTeX intermediate files'

cpbib:
	cp '$(MASTER_BIB)' 'bib/$bib_filename'

clean:
	newtex clean .
";

/// Writes every starter template entry that does not exist yet.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Entries that were created
pub fn install_default_template<P: AsRef<Path>>(config_dir: P) -> Result<Vec<PathBuf>> {
    let config_dir = config_dir.as_ref();
    fs::create_dir_all(config_dir)?;

    let mut created = Vec::new();
    for (name, content) in [
        (GITIGNORE_TEMPLATE, DEFAULT_GITIGNORE),
        (DOCUMENT_TEMPLATE, DEFAULT_DOCUMENT),
        (SCRIPT_TEMPLATE, DEFAULT_SCRIPT),
    ] {
        let path = config_dir.join(name);
        if path.exists() {
            debug!("Keeping existing {}", path.display());
            continue;
        }
        fs::write(&path, content)?;
        created.push(path);
    }

    for dir in ["figs", "styles"] {
        let path = config_dir.join(dir);
        if !path.exists() {
            fs::create_dir_all(&path)?;
            created.push(path);
        }
    }

    Ok(created)
}

/// Collects a configuration interactively, offering `existing` values as defaults.
///
/// Authors and affiliations are asked pairwise. The list ends at an empty
/// answer, or at [`END_OF_AUTHORS`] when an existing author is offered as
/// the default; at least one author is required.
pub fn prompt_config(
    prompt: &dyn Prompter,
    existing: Option<&Config>,
    today: NaiveDate,
) -> Result<Config> {
    let mut authors = Vec::new();
    let mut affiliations = Vec::new();

    loop {
        let index = authors.len();
        let default_author = existing.and_then(|c| c.authors.get(index)).cloned();
        let hint = if default_author.is_some() {
            format!("'{END_OF_AUTHORS}' to finish")
        } else {
            "leave empty to finish".to_string()
        };
        let author = prompt.input(
            format!("Author #{} ({hint})", index + 1),
            default_author,
            true,
        )?;
        let author = author.trim();
        if author.is_empty() || author == END_OF_AUTHORS {
            if authors.is_empty() {
                return Err(Error::ValidationError(
                    "at least one author is required".to_string(),
                ));
            }
            break;
        }
        let author = author.to_string();

        let default_affiliation = existing.and_then(|c| c.affiliations.get(index)).cloned();
        let affiliation =
            prompt.input(format!("Affiliation of {author}"), default_affiliation, false)?;
        authors.push(author);
        affiliations.push(affiliation.trim().to_string());
    }

    let master_bib_file = prompt.input(
        "Master bibliography file".to_string(),
        existing.map(|c| c.master_bib_file.clone()),
        false,
    )?;
    let default_style = prompt.input(
        "Default bibliography style".to_string(),
        existing.map(|c| c.default_style.clone()),
        false,
    )?;
    let dropbox = prompt.input(
        "Dropbox folder for shared repositories".to_string(),
        Some(existing.map_or_else(|| DEFAULT_DROPBOX.to_string(), |c| c.dropbox.clone())),
        false,
    )?;

    let config = Config {
        master_bib_file: master_bib_file.trim().to_string(),
        authors,
        affiliations,
        default_style: default_style.trim().to_string(),
        dropbox: dropbox.trim().to_string(),
        created: Some(today),
        template_dir: PathBuf::new(),
    };
    config.validate()?;
    Ok(config)
}

/// Runs the setup wizard and saves the result in `config_dir`.
pub fn configure(
    prompt: &dyn Prompter,
    config_dir: &Path,
    existing: Option<&Config>,
    today: NaiveDate,
) -> Result<Config> {
    let mut config = prompt_config(prompt, existing, today)?;
    let config_path = write_config(config_dir, &config)?;
    println!("Saved configuration to '{}'.", config_path.display());

    for path in install_default_template(config_dir)? {
        println!("Created template entry '{}'.", path.display());
    }

    config.template_dir = config_dir.to_path_buf();
    Ok(config)
}
