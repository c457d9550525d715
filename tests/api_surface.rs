//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

// types and text - spans and line helpers
use appreq::text::{
    byte_offset_to_position, clamp_offset, indentation, line_at, line_ending, line_span_at,
    lines_with_spans, without_cr,
};
use appreq::types::{DependencyBucket, ModuleEntry, ModuleSource, Span};

// patch module - checked edits
use appreq::patch::{ApplyError, ContentHash, TextEdit};

// error module - error types and codes
use appreq::error::{AppreqError, AppreqResult, OutputErrorCode};

// config module - settings layering
use appreq::config::{
    ConfigSource, Conventions, CoreModuleSet, LoadedLayer, ResolvedSettings, Settings,
    SettingsLayer, SettingsLoader, PROJECT_SETTINGS_FILE, SETTINGS_ENV_VAR,
};

// ============================================================================
// Require Bookkeeping
// ============================================================================

use appreq::catalog::{find_project_root, local_files, Catalog, Manifest, MANIFEST_FILE};
use appreq::classify::{
    bound_name, classify, is_lint_directive, matches_import, sort_key, ImportStyle, Indent,
    LineClass, LineKind,
};
use appreq::exports::{export_candidates, plan_export, ExportCandidate};
use appreq::header::{copyright_header, plan_header};
use appreq::merge::{
    import_line, locate_header_insertion, merge_import, plan_require, require_call, sorted_block,
    strip_js_extension, InsertMode, InsertionPoint, MergeRequest,
};
use appreq::naming::{
    camel_case, derive_identifier, extension_of, AliasRule, NamingRules, MAX_NORMALIZE_PASSES,
};

// ============================================================================
// Host Abstractions and Commands
// ============================================================================

use appreq::commands::{
    insert_export, insert_header, insert_require, module_choices, require_module,
    resolve_catalog, CommandOutcome, Placement,
};
use appreq::document::{Document, MemoryDocument};
use appreq::interaction::{Choice, InteractionAdapter, InteractionError, InteractionResult};

// output module - JSON output types
use appreq::output::{
    emit_response, CancelledResponse, CatalogResponse, DeriveResponse, EditInfo, EditResponse,
    ErrorInfo, ErrorResponse, SCHEMA_VERSION,
};

// ============================================================================
// Front Door
// ============================================================================

use appreq::cli::{run_derive, run_export, run_header, run_list, run_require, CliResponse};
use appreq::terminal::{parse_choice, PresetAdapter, TerminalAdapter};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // The imports above form the public API contract.
    let _ = std::any::type_name::<Span>();
    let _ = std::any::type_name::<TextEdit>();
    let _ = std::any::type_name::<AppreqError>();
    let _ = std::any::type_name::<Settings>();
    let _ = std::any::type_name::<Catalog>();
    let _ = std::any::type_name::<MemoryDocument>();
    let _ = std::any::type_name::<CommandOutcome>();
    let _ = std::any::type_name::<CliResponse>();
    let _ = std::any::type_name::<PresetAdapter>();
}

#[test]
fn schema_version_is_stable() {
    assert_eq!(SCHEMA_VERSION, "1");
}
