//! JSON output types and serialization for CLI responses.
//!
//! Every response carries `status` first and a `schema_version`. Edits are
//! reported with their byte span, the 1-indexed position where they start,
//! and the selection the editor should highlight afterwards.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{AppreqError, OutputErrorCode};
use crate::patch::TextEdit;
use crate::text::byte_offset_to_position;
use crate::types::{ModuleEntry, Span};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code (also the process exit code).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from an AppreqError.
    pub fn from_error(err: &AppreqError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            AppreqError::NoProjectRoot { searched_from } => {
                Some(serde_json::json!({ "searched_from": searched_from }))
            }
            AppreqError::FileNotFound { path }
            | AppreqError::ManifestParse { path, .. }
            | AppreqError::SettingsParse { path, .. } => {
                Some(serde_json::json!({ "path": path }))
            }
            AppreqError::InvalidAliasPattern { pattern, .. } => {
                Some(serde_json::json!({ "pattern": pattern }))
            }
            _ => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Response for any failed command.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &AppreqError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Response Structs
// ============================================================================

/// Response for `list`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub project_root: String,
    pub entries: Vec<ModuleEntry>,
}

impl CatalogResponse {
    pub fn new(
        file: impl Into<String>,
        project_root: impl Into<String>,
        entries: Vec<ModuleEntry>,
    ) -> Self {
        CatalogResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            project_root: project_root.into(),
            entries,
        }
    }
}

/// An applied (or planned) edit, located in the original buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditInfo {
    /// Replaced range of the original buffer.
    pub span: Span,
    /// 1-indexed line of `span.start`.
    pub line: u32,
    /// 1-indexed column of `span.start`.
    pub col: u32,
    pub new_text: String,
    /// Selection to highlight, in post-edit coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Span>,
}

impl EditInfo {
    /// Describe `edit` as computed against `original`.
    pub fn new(original: &str, edit: &TextEdit) -> Self {
        let (line, col) = byte_offset_to_position(original, edit.span.start);
        EditInfo {
            span: edit.span,
            line,
            col,
            new_text: edit.new_text.clone(),
            selection: edit.selection,
        }
    }
}

/// Response for `require`, `export` and `header`.
#[derive(Debug, Clone, Serialize)]
pub struct EditResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub file: String,
    /// The edit, or `null` when nothing needed to change.
    pub edit: Option<EditInfo>,
    /// Whether the file on disk was rewritten.
    pub applied: bool,
}

impl EditResponse {
    pub fn new(file: impl Into<String>, edit: Option<EditInfo>, applied: bool) -> Self {
        EditResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            edit,
            applied,
        }
    }
}

/// Response when the user dismissed a choice list.
#[derive(Debug, Clone, Serialize)]
pub struct CancelledResponse {
    /// Status: "cancelled".
    pub status: String,
    pub schema_version: String,
    pub file: String,
}

impl CancelledResponse {
    pub fn new(file: impl Into<String>) -> Self {
        CancelledResponse {
            status: "cancelled".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
        }
    }
}

/// Response for `derive`.
#[derive(Debug, Clone, Serialize)]
pub struct DeriveResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub module: String,
    pub is_core: bool,
    pub identifier: String,
}

impl DeriveResponse {
    pub fn new(module: impl Into<String>, is_core: bool, identifier: impl Into<String>) -> Self {
        DeriveResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            module: module.into(),
            is_core,
            identifier: identifier.into(),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
