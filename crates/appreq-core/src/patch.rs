//! Text edits with content preconditions.
//!
//! Every command computes a single `TextEdit` against the buffer it read.
//! The edit records a hash of the bytes it replaces, so a host that applies
//! it later can refuse to clobber text that changed in between.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::Span;

/// Hash type for content verification (SHA-256, stored as hex string for JSON compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an edit could not be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// The span lies outside the buffer or splits a character.
    #[error("span {span} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds { span: Span, len: usize },

    /// The bytes under the span no longer hash to the recorded value.
    #[error("content under {span} changed since the edit was computed")]
    HashMismatch { span: Span },
}

/// A single replace-range edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Range of the original buffer being replaced.
    pub span: Span,
    /// Replacement text.
    pub new_text: String,
    /// Hash of `buffer[span]` at the time the edit was computed.
    pub expected_before_hash: ContentHash,
    /// Selection to set after applying, in post-edit coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Span>,
}

impl TextEdit {
    /// Build an edit replacing `span` of `content` with `new_text`.
    ///
    /// `span` must already be clamped to `content`.
    pub fn replace(content: &str, span: Span, new_text: impl Into<String>) -> Self {
        let before = content.get(span.start..span.end).unwrap_or_default();
        TextEdit {
            span,
            new_text: new_text.into(),
            expected_before_hash: ContentHash::compute(before.as_bytes()),
            selection: None,
        }
    }

    /// Build a pure insertion at `offset`.
    pub fn insert(content: &str, offset: usize, new_text: impl Into<String>) -> Self {
        TextEdit::replace(content, Span::empty_at(offset), new_text)
    }

    /// Attach the selection to highlight after applying.
    pub fn with_selection(mut self, selection: Option<Span>) -> Self {
        self.selection = selection;
        self
    }

    /// Span the replacement occupies once applied.
    pub fn inserted_span(&self) -> Span {
        Span::new(self.span.start, self.span.start + self.new_text.len())
    }

    /// Check the precondition against `content`.
    pub fn verify(&self, content: &str) -> Result<(), ApplyError> {
        let before = content
            .get(self.span.start..self.span.end)
            .ok_or(ApplyError::OutOfBounds {
                span: self.span,
                len: content.len(),
            })?;
        if ContentHash::compute(before.as_bytes()) != self.expected_before_hash {
            return Err(ApplyError::HashMismatch { span: self.span });
        }
        Ok(())
    }

    /// Apply the edit to `content`, returning the new buffer.
    pub fn apply(&self, content: &str) -> Result<String, ApplyError> {
        self.verify(content)?;
        let mut out =
            String::with_capacity(content.len() - self.span.len() + self.new_text.len());
        out.push_str(&content[..self.span.start]);
        out.push_str(&self.new_text);
        out.push_str(&content[self.span.end..]);
        Ok(out)
    }
}
