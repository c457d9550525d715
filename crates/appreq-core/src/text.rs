//! Line-oriented helpers over a document buffer.
//!
//! All offsets are byte offsets into a `&str`. A "line span" never includes
//! its terminating `\n`, so the line after a span starts at `span.end + 1`.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns reported to users are **1-indexed**
//! - Byte offsets are **0-indexed**
//! - Offsets past the end of the buffer are clamped to its length

use crate::types::Span;

// ============================================================================
// Offset Clamping
// ============================================================================

/// Clamp `offset` into the buffer and back onto a UTF-8 character boundary.
pub fn clamp_offset(content: &str, offset: usize) -> usize {
    let mut offset = offset.min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ============================================================================
// Line Lookup
// ============================================================================

/// Span of the line containing `offset`, excluding the newline.
///
/// An offset sitting on a `\n` belongs to the line that newline ends.
pub fn line_span_at(content: &str, offset: usize) -> Span {
    let offset = clamp_offset(content, offset);
    let start = content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = content[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(content.len());
    Span::new(start, end)
}

/// Text of the line containing `offset`, without a trailing `\r`.
///
/// The span still runs up to the `\n`, so `span.end + 1` is the next line.
pub fn line_at(content: &str, offset: usize) -> (Span, &str) {
    let span = line_span_at(content, offset);
    let text = &content[span.start..span.end];
    (span, text.strip_suffix('\r').unwrap_or(text))
}

/// `span` shortened by a trailing `\r`, if it ends with one.
pub fn without_cr(content: &str, span: Span) -> Span {
    if span.end > span.start && content.as_bytes().get(span.end - 1) == Some(&b'\r') {
        Span::new(span.start, span.end - 1)
    } else {
        span
    }
}

/// Line ending used by the buffer: `\r\n` when its first line ends that way.
pub fn line_ending(content: &str) -> &'static str {
    match content.find('\n') {
        Some(i) if content[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Iterate over every line of `content` that starts before its end.
///
/// A trailing newline does not produce a final empty line, matching the
/// way the header scan walks a buffer.
pub fn lines_with_spans(content: &str) -> impl Iterator<Item = (Span, &str)> + '_ {
    let mut pos = 0usize;
    std::iter::from_fn(move || {
        if pos >= content.len() {
            return None;
        }
        let (span, line) = line_at(content, pos);
        pos = span.end + 1;
        Some((span, line))
    })
}

/// Leading indentation (spaces and tabs) of a line.
pub fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

// ============================================================================
// Position Conversion
// ============================================================================

/// Convert a byte offset to 1-indexed line and column (Unicode-aware).
///
/// Columns count Unicode scalar values (chars), not bytes.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current_offset = 0usize;

    for ch in content.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

// ============================================================================
// Tests
// ============================================================================
