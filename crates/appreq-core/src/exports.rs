//! Export-line insertion.
//!
//! Candidates are top-level `var`/`function` declarations that are not
//! requires. The chosen name is exported after the last existing export
//! line, in whichever form (`exports.` or `module.exports.`) the file
//! already uses.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::patch::TextEdit;
use crate::text::{line_ending, lines_with_spans, without_cr};
use crate::types::Span;

static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(var|function) (\w*)").expect("declaration pattern is valid"));

static EXPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(module\.)?exports\.\w* ?= ?(\w*);").expect("export pattern is valid")
});

/// A declaration that can be exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportCandidate {
    /// Declared name.
    pub name: String,
    /// 1-indexed line number.
    pub line_number: usize,
    /// Full text of the declaring line.
    pub line: String,
    /// Span of the declaring line.
    pub span: Span,
}

impl ExportCandidate {
    /// Choice-list detail: `"<line>: <text>"`.
    pub fn detail(&self) -> String {
        format!("{}: {}", self.line_number, self.line)
    }
}

/// Exportable declarations, and the index of the one under `selection`.
///
/// The preselected index is 0 when the selection touches no candidate.
pub fn export_candidates(content: &str, selection: Span) -> (Vec<ExportCandidate>, usize) {
    let mut candidates = Vec::new();
    let mut preselected = 0;

    for (index, (span, line)) in lines_with_spans(content).enumerate() {
        let Some(caps) = DECLARATION.captures(line) else {
            continue;
        };
        if line.contains("require") {
            continue;
        }
        if span.intersects(&selection) {
            preselected = candidates.len();
        }
        candidates.push(ExportCandidate {
            name: caps[2].to_string(),
            line_number: index + 1,
            line: line.to_string(),
            span,
        });
    }

    (candidates, preselected)
}

/// Plan the edit exporting `name`, or `None` if it is already exported.
pub fn plan_export(content: &str, name: &str) -> Option<TextEdit> {
    let mut insert_at = content.len();
    let mut module_form = false;

    for (span, line) in lines_with_spans(content) {
        let Some(caps) = EXPORT_LINE.captures(line) else {
            continue;
        };
        insert_at = without_cr(content, span).end;
        if &caps[2] == name {
            return None;
        }
        if caps.get(1).is_some() {
            module_form = true;
        }
    }

    let target = if module_form {
        "module.exports"
    } else {
        "exports"
    };
    let eol = line_ending(content);
    Some(TextEdit::insert(
        content,
        insert_at,
        format!("{eol}{target}.{name} = {name};"),
    ))
}
