//! Buffer host capability.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppreqResult;
use crate::patch::{ApplyError, TextEdit};
use crate::types::Span;

/// An open buffer with a primary selection.
pub trait Document {
    /// Path of the backing file, if any.
    fn path(&self) -> Option<&Path>;

    fn text(&self) -> &str;

    /// Primary selection, or an empty span at the caret.
    fn selection(&self) -> Span;

    /// Replace `span` with `text`.
    fn replace(&mut self, span: Span, text: &str) -> Result<(), ApplyError>;

    fn set_selection(&mut self, selection: Span);

    /// Verify and apply `edit`, then move the selection if it carries one.
    fn apply_edit(&mut self, edit: &TextEdit) -> AppreqResult<()> {
        edit.verify(self.text())?;
        self.replace(edit.span, &edit.new_text)?;
        if let Some(selection) = edit.selection {
            self.set_selection(selection);
        }
        debug!(span = %edit.span, inserted = edit.new_text.len(), "applied edit");
        Ok(())
    }
}

/// In-memory document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    path: Option<PathBuf>,
    text: String,
    selection: Span,
    modified: bool,
}

impl MemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        MemoryDocument {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Place the caret at `offset` (clamped to the buffer).
    pub fn with_cursor(mut self, offset: usize) -> Self {
        self.selection = Span::empty_at(offset.min(self.text.len()));
        self
    }

    pub fn with_selection(mut self, selection: Span) -> Self {
        self.selection = selection;
        self
    }

    /// Whether any replace has happened since construction.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl Document for MemoryDocument {
    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Span {
        self.selection
    }

    fn replace(&mut self, span: Span, text: &str) -> Result<(), ApplyError> {
        if self.text.get(span.start..span.end).is_none() {
            return Err(ApplyError::OutOfBounds {
                span,
                len: self.text.len(),
            });
        }
        self.text.replace_range(span.start..span.end, text);
        self.modified = true;
        Ok(())
    }

    fn set_selection(&mut self, selection: Span) {
        self.selection = selection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppreqError;

    #[test]
    fn apply_edit_replaces_and_selects() {
        let mut doc = MemoryDocument::new("var a;\n").with_path("/tmp/a.js");
        let edit = TextEdit::insert(doc.text(), 0, "// x\n").with_selection(Some(Span::new(0, 4)));
        doc.apply_edit(&edit).unwrap();
        assert_eq!(doc.text(), "// x\nvar a;\n");
        assert_eq!(doc.selection(), Span::new(0, 4));
        assert!(doc.is_modified());
        assert_eq!(doc.path(), Some(Path::new("/tmp/a.js")));
    }

    #[test]
    fn stale_edit_is_refused() {
        let mut doc = MemoryDocument::new("abc");
        let edit = TextEdit::replace("xyz", Span::new(0, 3), "q");
        let err = doc.apply_edit(&edit).unwrap_err();
        assert!(matches!(err, AppreqError::ApplyError { .. }));
        assert_eq!(doc.text(), "abc");
        assert!(!doc.is_modified());
    }

    #[test]
    fn edit_without_selection_keeps_caret() {
        let mut doc = MemoryDocument::new("abc").with_cursor(2);
        let edit = TextEdit::insert(doc.text(), 3, "d");
        doc.apply_edit(&edit).unwrap();
        assert_eq!(doc.selection(), Span::empty_at(2));
        assert_eq!(doc.into_text(), "abcd");
    }

    #[test]
    fn out_of_bounds_replace() {
        let mut doc = MemoryDocument::new("ab");
        assert!(doc.replace(Span::new(1, 5), "x").is_err());
    }
}
