//! User interaction for the generation hooks.
//! Stdin carries the renderer's JSON payload, so every interactive read goes
//! through dialoguer, which talks to the terminal directly.

use crate::error::{Error, Result};
use dialoguer::Input;

/// Parses a yes/no answer.
///
/// Returns `Some(true)` for `y`/`yes`, `Some(false)` for `n`/`no`
/// (case-insensitive) and `None` for anything else, in which case the caller
/// should re-prompt.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Abstraction over terminal prompting so hook logic stays testable.
pub trait Prompter {
    /// Asks a yes/no question, re-prompting until the answer parses.
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Blocks until the user presses Enter.
    fn wait_for_enter(&self, message: &str) -> Result<()>;
}

/// Dialoguer-backed prompter used by the hook binaries.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        loop {
            let answer: String = Input::new()
                .with_prompt(format!("{} [y/n]", message))
                .allow_empty(true)
                .interact_text()
                .map_err(|e| Error::PromptError(e.to_string()))?;

            match parse_yes_no(&answer) {
                Some(value) => return Ok(value),
                None => println!("Please answer 'y' or 'n'."),
            }
        }
    }

    fn wait_for_enter(&self, message: &str) -> Result<()> {
        let _: String = Input::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::PromptError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("yes"), Some(true));
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("YES"), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("N"), Some(false));
        assert_eq!(parse_yes_no(" y "), Some(true));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }
}
