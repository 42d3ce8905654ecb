//! Interactive input.

use dialoguer::Input;

use crate::{CoreError, CoreResult};

/// Collects free text from the operator.
pub trait Prompt {
    /// Shows `label` and returns what was typed. Empty answers are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn ask(&self, label: &str) -> CoreResult<String>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, label: &str) -> CoreResult<String> {
        Input::<String>::new()
            .with_prompt(label.trim_end().trim_end_matches(':'))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CoreError::Prompt(e.to_string()))
    }
}
