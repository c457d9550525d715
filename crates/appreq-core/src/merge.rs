//! Import block location and merging.
//!
//! Two insertion modes exist:
//!
//! - **Header**: scan the top of the document (after `'use strict';`) for
//!   the run of imports matching the new module's style and merge into it.
//!   Core imports form one run, non-core imports another, core first. When
//!   no matching run exists the new import is placed at the last position
//!   known to be on the right side of that ordering, wrapped in blank lines.
//! - **Cursor**: merge at the caret when it sits on a blank or import line,
//!   otherwise insert the bare `require(...)` call at the caret.
//!
//! Merging collects the new line and the contiguous same-style import lines
//! around the target line, drops duplicate bindings, sorts by binding name
//! case-insensitively and replaces the whole run in one edit.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::classify::{is_lint_directive, matches_import, sort_key, ImportStyle, Indent};
use crate::config::Conventions;
use crate::naming::{derive_identifier, NamingRules};
use crate::patch::TextEdit;
use crate::text::{clamp_offset, indentation, line_at, line_ending, without_cr};
use crate::types::Span;

static USE_STRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^'use strict';\r?$").expect("use strict pattern is valid"));

// ============================================================================
// Request Types
// ============================================================================

/// Where a require should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Merge into the document header.
    Header,
    /// Insert at the given byte offset, highlighting the result.
    Cursor(usize),
}

/// Result of scanning the header for an insertion line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsertionPoint {
    /// Start of the target line.
    pub offset: usize,
    /// The new import cannot join an existing run and gets blank lines around it.
    pub pad: bool,
}

/// Everything `merge_import` needs to know about the new import.
#[derive(Debug, Clone, Copy)]
pub struct MergeRequest<'a> {
    /// Module id as chosen from the catalog.
    pub module: &'a str,
    /// Offset of the target line (or caret).
    pub offset: usize,
    /// Isolate the new line instead of merging with neighbours.
    pub pad: bool,
    /// Whether the module is core.
    pub is_core: bool,
    /// Select the new line after the edit.
    pub highlight: bool,
}

// ============================================================================
// Entry Text
// ============================================================================

/// The module id without a trailing `.js`.
pub fn strip_js_extension(module: &str) -> &str {
    module.strip_suffix(".js").unwrap_or(module)
}

/// Call expression for `module`, terminated by `;`.
///
/// Relative (`./x.js`) and root-absolute (`/x`) ids use `appRequire` with
/// the leading marker and `.js` removed; anything else uses `require` with
/// the id verbatim.
pub fn require_call(module: &str) -> String {
    let stripped = strip_js_extension(module);
    if let Some(rest) = stripped.strip_prefix("./") {
        format!("appRequire('{rest}');")
    } else if stripped.starts_with('.') {
        format!("appRequire('{stripped}');")
    } else if let Some(rest) = stripped.strip_prefix('/') {
        format!("appRequire('{rest}');")
    } else {
        format!("require('{module}');")
    }
}

/// Full import line for `module`, with the given indentation.
pub fn import_line(module: &str, is_core: bool, indent: &str, rules: &NamingRules) -> String {
    format!(
        "{indent}var {} = {}",
        derive_identifier(module, is_core, rules),
        require_call(module)
    )
}

// ============================================================================
// Header Scan
// ============================================================================

/// Find the line a new import of `style` belongs on.
///
/// The scan starts on the line after `'use strict';` (or at the top).
/// Lint directives, and core imports when inserting a non-core one, move
/// the fallback position past themselves. Meeting a non-core import while
/// inserting a core one falls back immediately, so core stays first.
pub fn locate_header_insertion(content: &str, style: ImportStyle) -> InsertionPoint {
    let len = content.len();
    let mut pos = match USE_STRICT.find(content) {
        Some(m) => (m.end() + 1).min(len),
        None => 0,
    };
    let mut last_good = pos;
    let mut pad = false;

    while pos < len {
        let (span, line) = line_at(content, pos);

        if matches_import(line, style, Indent::Strict) {
            break;
        }
        match style {
            ImportStyle::Core => {
                if matches_import(line, ImportStyle::NonCore, Indent::Strict) {
                    pos = last_good;
                    pad = true;
                    break;
                }
                if is_lint_directive(line) {
                    last_good = span.end + 1;
                }
            }
            ImportStyle::NonCore => {
                if matches_import(line, ImportStyle::Core, Indent::Strict) || is_lint_directive(line)
                {
                    last_good = span.end + 1;
                }
            }
        }

        pos = span.end + 1;
    }

    if pos >= len {
        pos = last_good;
        pad = true;
    }

    let point = InsertionPoint {
        offset: pos.min(len),
        pad,
    };
    debug!(?style, offset = point.offset, pad = point.pad, "header insertion point");
    point
}

// ============================================================================
// Merge
// ============================================================================

/// Compute the edit inserting `request.module` at `request.offset`.
pub fn merge_import(content: &str, request: &MergeRequest<'_>, rules: &NamingRules) -> TextEdit {
    let offset = clamp_offset(content, request.offset);
    let (line_span, line) = line_at(content, offset);
    let style = ImportStyle::for_module(request.is_core);
    let target_matches = matches_import(line, style, Indent::Allowed);
    let target_blank = line.trim().is_empty();
    let eol = line_ending(content);

    if !target_blank && !target_matches {
        if !request.pad {
            return TextEdit::insert(content, offset, require_call(request.module));
        }
        let entry = import_line(request.module, request.is_core, "", rules);
        return if offset == content.len() {
            // Past a last line with no trailing newline.
            TextEdit::insert(content, offset, format!("{eol}{eol}{entry}{eol}"))
        } else {
            TextEdit::insert(content, line_span.start, format!("{eol}{entry}{eol}{eol}"))
        };
    }

    let entry = import_line(request.module, request.is_core, indentation(line), rules);
    let mut existing: Vec<&str> = Vec::new();
    let mut replace = line_span;

    if target_matches {
        existing.push(line);
    }

    if !request.pad {
        let mut start = line_span.start;
        while start > 0 {
            let (span, prev) = line_at(content, start - 1);
            if !matches_import(prev, style, Indent::Allowed) {
                break;
            }
            existing.push(prev);
            replace = replace.cover(&span);
            start = span.start;
        }

        let mut next = line_span.end + 1;
        while next < content.len() {
            let (span, following) = line_at(content, next);
            if !matches_import(following, style, Indent::Allowed) {
                break;
            }
            existing.push(following);
            replace = replace.cover(&span);
            next = span.end + 1;
        }
    }

    let replace = without_cr(content, replace);
    let mut block = sorted_block(existing.into_iter().chain(std::iter::once(entry.as_str())));
    if request.pad {
        block.insert(0, "");
        block.push("");
    }
    let new_text = block.join(eol);

    let selection = if request.highlight {
        let needle = entry.trim();
        new_text
            .find(needle)
            .map(|at| Span::new(replace.start + at, replace.start + at + needle.len()))
    } else {
        None
    };

    debug!(
        span = %replace,
        lines = block.len(),
        pad = request.pad,
        "merged import block"
    );
    TextEdit::replace(content, replace, new_text).with_selection(selection)
}

/// Drop lines whose binding repeats an earlier one, then sort by binding.
///
/// Earlier lines win, so existing imports are kept over a new duplicate.
pub fn sorted_block<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut block: Vec<(String, &str)> = lines
        .into_iter()
        .filter_map(|line| {
            let key = sort_key(line);
            seen.insert(key.clone()).then_some((key, line))
        })
        .collect();
    block.sort_by(|a, b| a.0.cmp(&b.0));
    block.into_iter().map(|(_, line)| line).collect()
}

// ============================================================================
// Entry Point
// ============================================================================

/// Plan the edit that requires `module` in `content`.
pub fn plan_require(
    content: &str,
    module: &str,
    mode: InsertMode,
    conventions: &Conventions,
) -> TextEdit {
    let is_core = conventions.core.contains(strip_js_extension(module));
    let request = match mode {
        InsertMode::Header => {
            let point = locate_header_insertion(content, ImportStyle::for_module(is_core));
            MergeRequest {
                module,
                offset: point.offset,
                pad: point.pad,
                is_core,
                highlight: false,
            }
        }
        InsertMode::Cursor(offset) => MergeRequest {
            module,
            offset,
            pad: false,
            is_core,
            highlight: true,
        },
    };
    merge_import(content, &request, &conventions.naming)
}

// ============================================================================
// Tests
// ============================================================================
