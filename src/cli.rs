//! CLI front door: binds the core commands to files on disk.
//!
//! Each runner reads the file into a `MemoryDocument`, runs the core
//! command against it, and writes the buffer back unless `dry_run` is set.
//! The caller picks the `InteractionAdapter` (terminal prompt or preset
//! value) and emits the returned response as JSON.
//!
//! All functions return `Result<T, AppreqError>`; the error carries the
//! exit code.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use appreq_core::catalog::find_project_root;
use appreq_core::commands::{
    insert_export, insert_header, require_module, resolve_catalog, CommandOutcome, Placement,
};
use appreq_core::config::{Conventions, SettingsLoader};
use appreq_core::document::{Document, MemoryDocument};
use appreq_core::error::{AppreqError, AppreqResult};
use appreq_core::interaction::InteractionAdapter;
use appreq_core::merge::strip_js_extension;
use appreq_core::naming::derive_identifier;
use appreq_core::output::{
    CancelledResponse, CatalogResponse, DeriveResponse, EditInfo, EditResponse,
};

/// Any successful CLI response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CliResponse {
    Catalog(CatalogResponse),
    Edit(EditResponse),
    Cancelled(CancelledResponse),
    Derive(DeriveResponse),
}

// ============================================================================
// Runners
// ============================================================================

/// `list`: the catalog offered for `file`.
pub fn run_list(
    loader: &SettingsLoader,
    ui: &dyn InteractionAdapter,
    file: &Path,
) -> AppreqResult<CliResponse> {
    let (_, catalog) = resolve_catalog(file, loader, ui)?;
    Ok(CliResponse::Catalog(CatalogResponse::new(
        file.display().to_string(),
        catalog.project_root.display().to_string(),
        catalog.entries,
    )))
}

/// `require`: insert a require into the header, or at `cursor`.
pub fn run_require(
    loader: &SettingsLoader,
    ui: &dyn InteractionAdapter,
    file: &Path,
    cursor: Option<usize>,
    dry_run: bool,
) -> AppreqResult<CliResponse> {
    let mut doc = open_document(file, cursor)?;
    let (resolved, catalog) = resolve_catalog(file, loader, ui)?;
    let conventions = Conventions::from_settings(&resolved.settings)?;
    let placement = match cursor {
        Some(_) => Placement::Cursor,
        None => Placement::Header,
    };

    let original = doc.text().to_string();
    let outcome = require_module(&mut doc, ui, &catalog.entries, placement, &conventions)?;
    finish(file, &original, &doc, outcome, dry_run)
}

/// `export`: export a top-level declaration.
pub fn run_export(
    ui: &dyn InteractionAdapter,
    file: &Path,
    cursor: Option<usize>,
    dry_run: bool,
) -> AppreqResult<CliResponse> {
    let mut doc = open_document(file, cursor)?;
    let original = doc.text().to_string();
    let outcome = insert_export(&mut doc, ui)?;
    finish(file, &original, &doc, outcome, dry_run)
}

/// `header`: insert the copyright header.
///
/// The holder comes from settings layered for the file's project, when
/// the file has one.
pub fn run_header(loader: &SettingsLoader, file: &Path, dry_run: bool) -> AppreqResult<CliResponse> {
    let mut doc = open_document(file, None)?;
    let base = loader.load(None)?;
    let settings = match find_project_root(file, &base.settings.project_folders) {
        Ok(root) => loader.load(Some(&root))?.settings,
        Err(_) => base.settings,
    };

    let original = doc.text().to_string();
    let outcome = insert_header(&mut doc, &settings.copyright_holder)?;
    finish(file, &original, &doc, outcome, dry_run)
}

/// `derive`: the identifier a module would be bound to.
///
/// `force_core` treats the module as core even when it is not listed.
pub fn run_derive(
    loader: &SettingsLoader,
    module: &str,
    force_core: bool,
) -> AppreqResult<CliResponse> {
    if module.is_empty() {
        return Err(AppreqError::invalid_args("module name is empty"));
    }
    let settings = loader.load(None)?.settings;
    let conventions = Conventions::from_settings(&settings)?;
    let is_core = force_core || conventions.core.contains(strip_js_extension(module));
    let identifier = derive_identifier(module, is_core, &conventions.naming);
    Ok(CliResponse::Derive(DeriveResponse::new(
        module, is_core, identifier,
    )))
}

// ============================================================================
// Helpers
// ============================================================================

fn open_document(file: &Path, cursor: Option<usize>) -> AppreqResult<MemoryDocument> {
    let text = fs::read_to_string(file).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AppreqError::file_not_found(file),
        _ => AppreqError::from(e),
    })?;
    let doc = MemoryDocument::new(text).with_path(file);
    Ok(match cursor {
        Some(offset) => doc.with_cursor(offset),
        None => doc,
    })
}

/// Write back (unless dry-run) and build the response for `outcome`.
fn finish(
    file: &Path,
    original: &str,
    doc: &MemoryDocument,
    outcome: CommandOutcome,
    dry_run: bool,
) -> AppreqResult<CliResponse> {
    let name = file.display().to_string();
    match outcome {
        CommandOutcome::Applied(edit) => {
            if !dry_run {
                fs::write(file, doc.text())?;
                info!(file = %name, "wrote file");
            }
            Ok(CliResponse::Edit(EditResponse::new(
                name,
                Some(EditInfo::new(original, &edit)),
                !dry_run,
            )))
        }
        CommandOutcome::Unchanged => {
            debug!(file = %name, "nothing to change");
            Ok(CliResponse::Edit(EditResponse::new(name, None, false)))
        }
        CommandOutcome::Cancelled => Ok(CliResponse::Cancelled(CancelledResponse::new(name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::PresetAdapter;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"lodash": "^4"}}"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/util.js"), "").unwrap();
        fs::write(
            dir.path().join("index.js"),
            "'use strict';\nvar fs = require('fs');\n\nmain();\n",
        )
        .unwrap();
        dir
    }

    mod require {
        use super::*;

        #[test]
        fn require_writes_file() {
            let dir = project();
            let file = dir.path().join("index.js");
            let response = run_require(
                &SettingsLoader::isolated(),
                &PresetAdapter::new("lodash"),
                &file,
                None,
                false,
            )
            .unwrap();
            let CliResponse::Edit(edit) = response else {
                panic!("expected edit response");
            };
            assert!(edit.applied);
            assert_eq!(
                fs::read_to_string(&file).unwrap(),
                "'use strict';\nvar fs = require('fs');\n\nvar Lodash = require('lodash');\n\nmain();\n"
            );
        }

        #[test]
        fn dry_run_leaves_file_alone() {
            let dir = project();
            let file = dir.path().join("index.js");
            let before = fs::read_to_string(&file).unwrap();
            let response = run_require(
                &SettingsLoader::isolated(),
                &PresetAdapter::new("./lib/util.js"),
                &file,
                None,
                true,
            )
            .unwrap();
            assert!(matches!(response, CliResponse::Edit(ref e) if !e.applied && e.edit.is_some()));
            assert_eq!(fs::read_to_string(&file).unwrap(), before);
        }

        #[test]
        fn unknown_module_is_invalid_arguments() {
            let dir = project();
            let err = run_require(
                &SettingsLoader::isolated(),
                &PresetAdapter::new("express"),
                &dir.path().join("index.js"),
                None,
                true,
            )
            .unwrap_err();
            assert!(matches!(err, AppreqError::InvalidArguments { .. }));
        }

        #[test]
        fn missing_file_is_reported() {
            let dir = project();
            let err = run_require(
                &SettingsLoader::isolated(),
                &PresetAdapter::new("lodash"),
                &dir.path().join("nope.js"),
                None,
                true,
            )
            .unwrap_err();
            assert!(matches!(err, AppreqError::FileNotFound { .. }));
        }
    }

    #[test]
    fn list_reports_catalog() {
        let dir = project();
        let response = run_list(
            &SettingsLoader::isolated(),
            &PresetAdapter::new("x"),
            &dir.path().join("index.js"),
        )
        .unwrap();
        let CliResponse::Catalog(catalog) = response else {
            panic!("expected catalog response");
        };
        let ids: Vec<&str> = catalog.entries.iter().map(|e| e.module_id.as_str()).collect();
        assert_eq!(&ids[..3], ["./lib/util.js", "./package.json", "lodash"]);
    }

    #[test]
    fn export_with_preset_name() {
        let dir = project();
        let file = dir.path().join("lib/util.js");
        fs::write(&file, "function helper() {}\n").unwrap();
        run_export(&PresetAdapter::new("helper"), &file, None, false).unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "function helper() {}\n\nexports.helper = helper;"
        );
    }

    #[test]
    fn header_uses_project_holder() {
        let dir = project();
        fs::write(
            dir.path().join(".appreq.json"),
            r#"{"copyright_holder": "Acme, Inc."}"#,
        )
        .unwrap();
        let file = dir.path().join("index.js");
        run_header(&SettingsLoader::isolated(), &file, false).unwrap();
        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("-present Acme, Inc.\n"));
    }

    #[test]
    fn derive_reports_identifier() {
        let response = run_derive(&SettingsLoader::isolated(), "child_process", false).unwrap();
        let CliResponse::Derive(derive) = response else {
            panic!("expected derive response");
        };
        assert!(derive.is_core);
        assert_eq!(derive.identifier, "childProcess");
    }
}
