//! Document descriptor and the project naming convention.

use crate::constants::DIR_PREFIX;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use std::fmt;

/// Kind of document being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum DocType {
    Fp,
    Gr,
    Gt,
    Rp,
    Ms,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Fp => "FP",
            DocType::Gr => "GR",
            DocType::Gt => "GT",
            DocType::Rp => "RP",
            DocType::Ms => "MS",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to name and populate one new document.
#[derive(Debug, Clone)]
pub struct DocumentDescriptor {
    pub doc_type: DocType,
    /// Normalized: whitespace and hyphens replaced by underscores.
    pub short_name: String,
    pub title: String,
    pub creation_date: NaiveDate,
}

impl DocumentDescriptor {
    /// Builds a descriptor, normalizing `short_name`.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `short_name` or `title` is blank, or
    ///   `short_name` contains a path separator
    pub fn new<S: AsRef<str>, T: Into<String>>(
        doc_type: DocType,
        short_name: S,
        title: T,
        creation_date: NaiveDate,
    ) -> Result<Self> {
        let short_name = normalize_short_name(short_name.as_ref());
        if short_name.trim_matches('_').is_empty() {
            return Err(Error::ValidationError("short name must not be empty".to_string()));
        }
        if short_name.contains(['/', '\\']) {
            return Err(Error::ValidationError(format!(
                "short name '{short_name}' must not contain a path separator"
            )));
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::ValidationError("title must not be empty".to_string()));
        }

        Ok(Self {
            doc_type,
            short_name,
            title,
            creation_date,
        })
    }

    /// Computes `(dir_name, doc_name)` for the given first author.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use newtex::document::{DocType, DocumentDescriptor};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let doc = DocumentDescriptor::new(DocType::Ms, "quantum sensing", "QS", date).unwrap();
    /// let (dir, file) = doc.names("John A. Marohn").unwrap();
    /// assert_eq!(dir, "_JAM_MS__Marohn202403__quantum_sensing");
    /// assert_eq!(file, "Marohn202403__quantum_sensing.tex");
    /// ```
    pub fn names(&self, first_author: &str) -> Result<(String, String)> {
        let last_name = last_name(first_author)?;
        let stem = format!(
            "{}{}__{}",
            last_name,
            self.creation_date.format("%Y%m"),
            self.short_name
        );
        let dir_name = format!("{}{}__{}", DIR_PREFIX, self.doc_type, stem);
        let doc_name = format!("{stem}.tex");

        Ok((dir_name, doc_name))
    }
}

/// Replaces every whitespace character and hyphen with an underscore.
pub fn normalize_short_name(short_name: &str) -> String {
    short_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect()
}

/// Last whitespace-delimited token of an author's name.
pub fn last_name(author: &str) -> Result<&str> {
    author
        .split_whitespace()
        .last()
        .ok_or_else(|| Error::ValidationError("the first author's name is empty".to_string()))
}

/// Human-readable creation date, e.g. "March 15, 2024".
pub fn human_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
