//! Interaction adapters for the command line.
//!
//! - `TerminalAdapter`: numbered list on stderr, index read from stdin
//! - `PresetAdapter`: picks the choice whose value (or, failing that, whose
//!   label) equals a string given up front

use std::cell::RefCell;
use std::io::{self, BufRead, IsTerminal, Stderr, StdinLock, Write};

use tracing::error;

use appreq_core::interaction::{Choice, InteractionAdapter, InteractionError, InteractionResult};

// ============================================================================
// Terminal
// ============================================================================

/// Prompts on a writer and reads the answer from a reader.
///
/// An empty answer, a negative number or end of input cancels. A
/// non-interactive adapter refuses to prompt with `InteractionError::NonTty`.
pub struct TerminalAdapter<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
    interactive: bool,
}

impl TerminalAdapter<StdinLock<'static>, Stderr> {
    /// Adapter on the process's stdin and stderr.
    ///
    /// Prompting is only allowed when stdin is a terminal.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        TerminalAdapter::new(stdin.lock(), io::stderr()).with_interactive(interactive)
    }
}

impl<R: BufRead, W: Write> TerminalAdapter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalAdapter {
            input: RefCell::new(input),
            output: RefCell::new(output),
            interactive: true,
        }
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn render(&self, prompt: &str, choices: &[Choice], preselected: usize) -> io::Result<()> {
        let mut out = self.output.borrow_mut();
        writeln!(out, "{prompt}:")?;
        for (index, choice) in choices.iter().enumerate() {
            let marker = if index == preselected { '>' } else { ' ' };
            writeln!(out, "{marker} {index:>3}  {}  ({})", choice.label, choice.detail)?;
        }
        write!(out, "choice [{preselected}, empty to cancel]: ")?;
        out.flush()
    }
}

impl<R: BufRead, W: Write> InteractionAdapter for TerminalAdapter<R, W> {
    fn choose(
        &self,
        prompt: &str,
        choices: &[Choice],
        preselected: usize,
    ) -> InteractionResult<usize> {
        if choices.is_empty() {
            return Err(InteractionError::InvalidInput(
                "choices cannot be empty".to_string(),
            ));
        }
        if !self.interactive {
            return Err(InteractionError::NonTty);
        }
        self.render(prompt, choices, preselected)?;

        let mut answer = String::new();
        let read = self.input.borrow_mut().read_line(&mut answer)?;
        if read == 0 {
            return Err(InteractionError::Cancelled);
        }
        parse_choice(&answer, choices.len())
    }

    fn show_error(&self, message: &str) {
        let mut out = self.output.borrow_mut();
        if writeln!(out, "error: {message}").is_err() {
            error!(message, "could not report error to terminal");
        }
    }
}

/// Parse a typed answer into an index below `len`.
pub fn parse_choice(answer: &str, len: usize) -> InteractionResult<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(InteractionError::Cancelled);
    }
    let index: i64 = answer
        .parse()
        .map_err(|_| InteractionError::InvalidInput(format!("'{answer}' is not a number")))?;
    if index < 0 {
        return Err(InteractionError::Cancelled);
    }
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| InteractionError::InvalidInput(format!("choice {index} out of range")))
}

// ============================================================================
// Preset
// ============================================================================

/// Picks the choice whose value equals the preset.
///
/// When no value matches, a label may be given instead, as long as only one
/// choice carries it.
#[derive(Debug, Clone)]
pub struct PresetAdapter {
    value: String,
}

impl PresetAdapter {
    pub fn new(value: impl Into<String>) -> Self {
        PresetAdapter {
            value: value.into(),
        }
    }
}

impl InteractionAdapter for PresetAdapter {
    fn choose(
        &self,
        _prompt: &str,
        choices: &[Choice],
        _preselected: usize,
    ) -> InteractionResult<usize> {
        let mut found = positions(choices, |c| c.value == self.value);
        if found.is_empty() {
            found = positions(choices, |c| c.label == self.value);
        }

        match found.as_slice() {
            [index] => Ok(*index),
            [] => Err(InteractionError::InvalidInput(format!(
                "no choice matches '{}'",
                self.value
            ))),
            _ => {
                let candidates: Vec<&str> =
                    found.iter().map(|&i| choices[i].value.as_str()).collect();
                Err(InteractionError::InvalidInput(format!(
                    "'{}' is ambiguous, use one of: {}",
                    self.value,
                    candidates.join(", ")
                )))
            }
        }
    }

    fn show_error(&self, message: &str) {
        error!(message, "command failed");
    }
}

fn positions(choices: &[Choice], matches: impl Fn(&Choice) -> bool) -> Vec<usize> {
    choices
        .iter()
        .enumerate()
        .filter(|(_, c)| matches(c))
        .map(|(index, _)| index)
        .collect()
}
