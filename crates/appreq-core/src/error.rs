//! Error types and error code constants for appreq.
//!
//! `AppreqError` is the single error type surfaced to the CLI. Subsystem
//! errors (settings parsing, manifest reading, edit application) are
//! bridged into it so every failure renders the same way in JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments or settings (bad input from caller)
//! - `3`: Resolution errors (no project root, file not found, broken manifest)
//! - `4`: Apply errors (buffer changed under a computed edit)
//! - `10`: Internal errors (bugs, unexpected state, IO)

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller or unusable settings.
    InvalidArguments = 2,
    /// Resolution errors (project root, files, manifest).
    ResolutionError = 3,
    /// Apply errors (stale edit).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum AppreqError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// No directory holding a `package.json` could be found.
    #[error(
        "no project root found from {searched_from}: you must have a package.json \
         in your project's root directory"
    )]
    NoProjectRoot { searched_from: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The project manifest is not valid JSON.
    #[error("malformed manifest {path}: {message}")]
    ManifestParse { path: String, message: String },

    /// A settings file is not valid JSON or has the wrong shape.
    #[error("invalid settings file {path}: {message}")]
    SettingsParse { path: String, message: String },

    /// An alias key is not a valid regular expression.
    #[error("invalid alias pattern '{pattern}': {message}")]
    InvalidAliasPattern { pattern: String, message: String },

    /// A computed edit no longer matches the buffer.
    #[error("apply error: {message}")]
    ApplyError { message: String },

    /// IO failure while reading or writing project files.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

/// Result type for appreq operations.
pub type AppreqResult<T> = Result<T, AppreqError>;

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&AppreqError> for OutputErrorCode {
    fn from(err: &AppreqError) -> Self {
        match err {
            AppreqError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            AppreqError::SettingsParse { .. } => OutputErrorCode::InvalidArguments,
            AppreqError::InvalidAliasPattern { .. } => OutputErrorCode::InvalidArguments,
            AppreqError::NoProjectRoot { .. } => OutputErrorCode::ResolutionError,
            AppreqError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            AppreqError::ManifestParse { .. } => OutputErrorCode::ResolutionError,
            AppreqError::ApplyError { .. } => OutputErrorCode::ApplyError,
            AppreqError::Io { .. } => OutputErrorCode::InternalError,
            AppreqError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<AppreqError> for OutputErrorCode {
    fn from(err: AppreqError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<io::Error> for AppreqError {
    fn from(err: io::Error) -> Self {
        AppreqError::Io {
            message: err.to_string(),
        }
    }
}

impl From<crate::patch::ApplyError> for AppreqError {
    fn from(err: crate::patch::ApplyError) -> Self {
        AppreqError::ApplyError {
            message: err.to_string(),
        }
    }
}

impl From<crate::interaction::InteractionError> for AppreqError {
    fn from(err: crate::interaction::InteractionError) -> Self {
        use crate::interaction::InteractionError;
        match err {
            InteractionError::InvalidInput(message) => AppreqError::InvalidArguments { message },
            InteractionError::NonTty => AppreqError::invalid_args(
                "stdin is not a terminal; pass --module or --name to choose without a prompt",
            ),
            other => AppreqError::Io {
                message: other.to_string(),
            },
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl AppreqError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        AppreqError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: &Path) -> Self {
        AppreqError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a no-project-root error for a search that began at `start`.
    pub fn no_project_root(start: &Path) -> Self {
        AppreqError::NoProjectRoot {
            searched_from: start.display().to_string(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppreqError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
