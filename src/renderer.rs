//! Placeholder substitution for newtex templates.
//! Templates reference values as `$name` or `${name}`; `$$` is a literal
//! dollar sign and any other `$` passes through unchanged.
use crate::error::{Error, Result};
use indexmap::IndexMap;
use regex::{Captures, Regex};

/// Substitution context: placeholder name to replacement text, in insertion order.
pub type Context = IndexMap<String, String>;

/// Sub-template applied once per author/affiliation pair.
pub const AUTHOR_AFFILIATION_TEMPLATE: &str =
    "\n    \\author{$author}\n    \\affiliation{$affiliation}";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Placeholder values for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &Context) -> Result<String>;
}

/// Single-pass `$placeholder` renderer.
pub struct PlaceholderRenderer {
    pattern: Regex,
}

impl PlaceholderRenderer {
    /// Creates a new PlaceholderRenderer instance.
    pub fn new() -> Self {
        let pattern = Regex::new(concat!(
            r"\$(?:(?P<escaped>\$)",
            r"|(?P<named>[_A-Za-z][_A-Za-z0-9]*)",
            r"|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\})",
        ))
        .expect("placeholder pattern is valid");
        Self { pattern }
    }

    /// Names of the placeholders referenced by `template`, in order of first use.
    pub fn placeholders(&self, template: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in self.pattern.captures_iter(template) {
            if let Some(name) = placeholder_name(&caps) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        PlaceholderRenderer::new()
    }
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("named").or_else(|| caps.name("braced")).map(|m| m.as_str())
}

impl TemplateRenderer for PlaceholderRenderer {
    /// Replacement values are copied verbatim and never re-scanned, so a
    /// title containing `$main_author` stays literal.
    ///
    /// # Errors
    /// * `Error::MissingPlaceholderValue` for the first placeholder that has
    ///   no entry in `context`; no partial output is returned
    fn render(&self, template: &str, context: &Context) -> Result<String> {
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(template) {
            let whole = caps.get(0).expect("capture group 0 always matches");
            rendered.push_str(&template[last..whole.start()]);
            last = whole.end();

            if caps.name("escaped").is_some() {
                rendered.push('$');
                continue;
            }

            let name = placeholder_name(&caps).unwrap_or_default();
            match context.get(name) {
                Some(value) => rendered.push_str(value),
                None => {
                    return Err(Error::MissingPlaceholderValue {
                        name: name.to_string(),
                    });
                }
            }
        }
        rendered.push_str(&template[last..]);

        Ok(rendered)
    }
}

/// Renders one author/affiliation entry per pair, in input order, joined by
/// newlines. The entry template starts with a newline, so consecutive
/// entries are separated by a blank line.
///
/// # Errors
/// * `Error::AuthorAffiliationMismatch` when the slices differ in length
pub fn render_author_block(
    engine: &dyn TemplateRenderer,
    authors: &[String],
    affiliations: &[String],
) -> Result<String> {
    if authors.len() != affiliations.len() {
        return Err(Error::AuthorAffiliationMismatch {
            authors: authors.len(),
            affiliations: affiliations.len(),
        });
    }

    let entries = authors
        .iter()
        .zip(affiliations)
        .map(|(author, affiliation)| {
            let mut context = Context::new();
            context.insert("author".to_string(), author.clone());
            context.insert("affiliation".to_string(), affiliation.clone());
            engine.render(AUTHOR_AFFILIATION_TEMPLATE, &context)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(entries.join("\n"))
}
