//! Copyright header block.

use chrono::{Datelike, Local};

use crate::patch::TextEdit;
use crate::text::line_ending;

/// Header text for `year`, ending with the strict-mode directive.
pub fn copyright_header(year: i32, holder: &str) -> String {
    let holder = holder.trim();
    let owner = if holder.is_empty() {
        String::new()
    } else {
        format!(" {holder}")
    };
    format!("/**\n * Copyright {year}-present{owner}\n *\n */\n'use strict';")
}

/// Plan inserting the header for the current local year at the top.
///
/// A newline separates the header from existing text. The header uses the
/// buffer's own line ending.
pub fn plan_header(content: &str, holder: &str) -> TextEdit {
    let eol = line_ending(content);
    let mut header = copyright_header(Local::now().year(), holder).replace('\n', eol);
    if !content.is_empty() {
        header.push_str(eol);
    }
    TextEdit::insert(content, 0, header)
}
