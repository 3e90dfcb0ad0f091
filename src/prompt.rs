//! User confirmation prompts.

use crate::error::{Error, Result};
use dialoguer::Confirm;
use std::io::IsTerminal;

fn prompt_error(err: dialoguer::Error) -> Error {
    match err {
        dialoguer::Error::IO(source) => Error::IoError(source),
    }
}

/// Asks the user yes/no questions.
pub trait Prompter {
    /// Returns true right away when `skip_prompt` is set.
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool>;
}

/// Prompter backed by dialoguer. Without an interactive terminal every
/// question is answered "no".
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool> {
        if skip_prompt {
            return Ok(true);
        }
        if !std::io::stdin().is_terminal() {
            return Ok(false);
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}
