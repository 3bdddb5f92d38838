//! User interaction for newtex.
//! Everything interactive goes through [`Prompter`] so the CLI flow and the
//! setup wizard can be driven by scripted answers in tests.

use crate::error::Result;
use dialoguer::{Confirm, Input, Select};

pub trait Prompter {
    /// Asks a yes/no question. Returns `true` without asking when `skip` is set.
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool>;

    /// Asks for a line of text, offering `default` when given.
    fn input(&self, prompt: String, default: Option<String>, allow_empty: bool) -> Result<String>;

    /// Asks the user to pick one of `items`; returns its index.
    fn select(&self, prompt: String, items: &[String], default: usize) -> Result<usize>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }

    fn input(&self, prompt: String, default: Option<String>, allow_empty: bool) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(allow_empty);
        if let Some(default) = default {
            input = input.default(default);
        }
        Ok(input.interact_text()?)
    }

    fn select(&self, prompt: String, items: &[String], default: usize) -> Result<usize> {
        Ok(Select::new().with_prompt(prompt).items(items).default(default).interact()?)
    }
}
