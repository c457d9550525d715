//! Interaction adapter trait for choice lists and error reporting.
//!
//! Commands never talk to a terminal or editor directly. They ask an
//! `InteractionAdapter` to pick one entry from a list, and report failures
//! through it. The CLI provides a terminal prompt and a preset adapter for
//! non-interactive runs; tests use mocks.
//!
//! The trait is object-safe, allowing it to be used as `dyn InteractionAdapter`.

use thiserror::Error;

/// Error type for interaction operations
#[derive(Error, Debug)]
pub enum InteractionError {
    /// User dismissed the choice list without picking anything
    #[error("operation cancelled by user")]
    Cancelled,

    /// Standard input is not usable for prompting
    #[error("stdin is not a TTY - interactive input unavailable")]
    NonTty,

    /// IO error during interaction
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for InteractionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for interaction operations
pub type InteractionResult<T> = Result<T, InteractionError>;

/// One row of a choice list: a label, a detail line and the value it stands for.
///
/// The value identifies the row (a module id, a declared name) and defaults
/// to the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub detail: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, detail: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
            detail: detail.into(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Host-side user interaction.
pub trait InteractionAdapter {
    /// Ask the user to pick one of `choices`.
    ///
    /// `preselected` is the index highlighted initially. Returns the index
    /// of the picked choice, or `InteractionError::Cancelled`.
    fn choose(
        &self,
        prompt: &str,
        choices: &[Choice],
        preselected: usize,
    ) -> InteractionResult<usize>;

    /// Report an error to the user.
    fn show_error(&self, message: &str);
}
