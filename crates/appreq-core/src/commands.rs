//! End-to-end command flows over a `Document` and an `InteractionAdapter`.
//!
//! Each command: build choices, ask the user, plan the edit with the pure
//! functions, apply it to the document. A cancelled choice leaves the
//! document untouched and is reported as `CommandOutcome::Cancelled`.

use std::path::Path;

use tracing::{debug, info};

use crate::catalog::{find_project_root, Catalog};
use crate::config::{Conventions, ResolvedSettings, SettingsLoader};
use crate::document::Document;
use crate::error::{AppreqError, AppreqResult};
use crate::exports::{export_candidates, plan_export};
use crate::header::plan_header;
use crate::interaction::{Choice, InteractionAdapter, InteractionError};
use crate::merge::{plan_require, InsertMode};
use crate::patch::TextEdit;
use crate::types::{ModuleEntry, ModuleSource};

/// What a command did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The edit was applied.
    Applied(TextEdit),
    /// Nothing needed to change.
    Unchanged,
    /// The user dismissed the choice list.
    Cancelled,
}

/// Where the require command puts the new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Into the sorted import block at the top of the file.
    Header,
    /// At the start of the primary selection.
    Cursor,
}

// ============================================================================
// Catalog Resolution
// ============================================================================

/// Resolve the project root, the settings layered for it, and the catalog.
///
/// Settings are loaded once without a project to learn the fallback
/// folders, then again with the project layer once the root is known.
/// A missing project root is shown to the user before being returned.
pub fn resolve_catalog(
    file: &Path,
    loader: &SettingsLoader,
    ui: &dyn InteractionAdapter,
) -> AppreqResult<(ResolvedSettings, Catalog)> {
    let base = loader.load(None)?;
    let root = match find_project_root(file, &base.settings.project_folders) {
        Ok(root) => root,
        Err(err) => {
            ui.show_error(&err.to_string());
            return Err(err);
        }
    };
    let resolved = loader.load(Some(&root))?;
    let catalog = Catalog::build(&root, Some(file), &resolved.settings)?;
    debug!(entries = catalog.len(), root = %root.display(), "catalog resolved");
    Ok((resolved, catalog))
}

/// Choice-list rows for catalog entries.
///
/// Local files show their path; everything else shows where it came from.
/// Each row's value is the module id.
pub fn module_choices(entries: &[ModuleEntry]) -> Vec<Choice> {
    entries
        .iter()
        .map(|entry| {
            let detail = match entry.source {
                ModuleSource::LocalFile => entry.module_id.clone(),
                source => source.label().to_string(),
            };
            Choice::new(entry.display_name.as_str(), detail).with_value(entry.module_id.as_str())
        })
        .collect()
}

// ============================================================================
// Commands
// ============================================================================

/// Ask for a module from `entries` and require it in `doc`.
pub fn require_module(
    doc: &mut dyn Document,
    ui: &dyn InteractionAdapter,
    entries: &[ModuleEntry],
    placement: Placement,
    conventions: &Conventions,
) -> AppreqResult<CommandOutcome> {
    let choices = module_choices(entries);
    let Some(index) = pick(ui, "Require module", &choices, 0)? else {
        return Ok(CommandOutcome::Cancelled);
    };
    let module = &entries[index].module_id;
    insert_require(doc, module, placement, conventions).map(CommandOutcome::Applied)
}

/// Require `module` in `doc` without asking.
pub fn insert_require(
    doc: &mut dyn Document,
    module: &str,
    placement: Placement,
    conventions: &Conventions,
) -> AppreqResult<TextEdit> {
    let mode = match placement {
        Placement::Header => InsertMode::Header,
        Placement::Cursor => InsertMode::Cursor(doc.selection().start),
    };
    let edit = plan_require(doc.text(), module, mode, conventions);
    doc.apply_edit(&edit)?;
    info!(module, span = %edit.span, "inserted require");
    Ok(edit)
}

/// Ask for a top-level declaration and export it.
pub fn insert_export(
    doc: &mut dyn Document,
    ui: &dyn InteractionAdapter,
) -> AppreqResult<CommandOutcome> {
    let (candidates, preselected) = export_candidates(doc.text(), doc.selection());
    if candidates.is_empty() {
        debug!("no exportable declarations");
        return Ok(CommandOutcome::Unchanged);
    }

    let choices: Vec<Choice> = candidates
        .iter()
        .map(|c| Choice::new(c.name.as_str(), c.detail()))
        .collect();
    let Some(index) = pick(ui, "Export", &choices, preselected)? else {
        return Ok(CommandOutcome::Cancelled);
    };

    let name = &candidates[index].name;
    match plan_export(doc.text(), name) {
        Some(edit) => {
            doc.apply_edit(&edit)?;
            info!(name = %name, "inserted export");
            Ok(CommandOutcome::Applied(edit))
        }
        None => {
            debug!(name = %name, "already exported");
            Ok(CommandOutcome::Unchanged)
        }
    }
}

/// Insert the copyright header at the top of `doc`.
pub fn insert_header(doc: &mut dyn Document, holder: &str) -> AppreqResult<CommandOutcome> {
    let edit = plan_header(doc.text(), holder);
    doc.apply_edit(&edit)?;
    Ok(CommandOutcome::Applied(edit))
}

/// Run a choice list; `None` when cancelled.
fn pick(
    ui: &dyn InteractionAdapter,
    prompt: &str,
    choices: &[Choice],
    preselected: usize,
) -> AppreqResult<Option<usize>> {
    match ui.choose(prompt, choices, preselected) {
        Ok(index) if index < choices.len() => Ok(Some(index)),
        Ok(index) => Err(AppreqError::internal(format!(
            "adapter returned choice {index} out of range (0..{})",
            choices.len()
        ))),
        Err(InteractionError::Cancelled) => {
            debug!(prompt, "choice cancelled");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::interaction::InteractionResult;
    use crate::types::{DependencyBucket, Span};
    use std::cell::RefCell;

    /// Picks the choice with the given label, or cancels.
    struct ByLabel {
        label: Option<&'static str>,
        seen_preselected: RefCell<Option<usize>>,
        errors: RefCell<Vec<String>>,
    }

    impl ByLabel {
        fn new(label: Option<&'static str>) -> Self {
            ByLabel {
                label,
                seen_preselected: RefCell::new(None),
                errors: RefCell::new(Vec::new()),
            }
        }
    }

    impl InteractionAdapter for ByLabel {
        fn choose(
            &self,
            _prompt: &str,
            choices: &[Choice],
            preselected: usize,
        ) -> InteractionResult<usize> {
            *self.seen_preselected.borrow_mut() = Some(preselected);
            let label = self.label.ok_or(InteractionError::Cancelled)?;
            choices
                .iter()
                .position(|c| c.label == label)
                .ok_or(InteractionError::Cancelled)
        }

        fn show_error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    fn entries() -> Vec<ModuleEntry> {
        vec![
            ModuleEntry::new("foo-bar.js", "./lib/foo-bar.js", ModuleSource::LocalFile),
            ModuleEntry::new(
                "lodash",
                "lodash",
                ModuleSource::Dependency(DependencyBucket::Dependencies),
            ),
            ModuleEntry::new("fs", "fs", ModuleSource::Core),
        ]
    }

    mod require {
        use super::*;

        #[test]
        fn header_require_applies_edit() {
            let mut doc = MemoryDocument::new("'use strict';\nvar Lodash = require('lodash');\n\nmain();\n");
            let ui = ByLabel::new(Some("foo-bar.js"));
            let outcome = require_module(
                &mut doc,
                &ui,
                &entries(),
                Placement::Header,
                &Conventions::default(),
            )
            .unwrap();
            assert!(matches!(outcome, CommandOutcome::Applied(_)));
            assert_eq!(
                doc.text(),
                "'use strict';\nvar FooBar = appRequire('lib/foo-bar');\nvar Lodash = require('lodash');\n\nmain();\n"
            );
        }

        #[test]
        fn cancelled_choice_leaves_document_untouched() {
            let original = "'use strict';\nmain();\n";
            let mut doc = MemoryDocument::new(original);
            let ui = ByLabel::new(None);
            let outcome = require_module(
                &mut doc,
                &ui,
                &entries(),
                Placement::Header,
                &Conventions::default(),
            )
            .unwrap();
            assert_eq!(outcome, CommandOutcome::Cancelled);
            assert_eq!(doc.text(), original);
            assert!(!doc.is_modified());
        }

        #[test]
        fn cursor_require_highlights_line() {
            let mut doc = MemoryDocument::new("function f() {\n\n}\n").with_cursor(15);
            let edit =
                insert_require(&mut doc, "fs", Placement::Cursor, &Conventions::default())
                    .unwrap();
            assert!(doc.text().contains("var fs = require('fs');"));
            assert_eq!(doc.selection(), edit.selection.unwrap());
        }
    }

    mod choices {
        use super::*;

        #[test]
        fn details_show_path_or_origin() {
            let choices = module_choices(&entries());
            assert_eq!(choices[0].detail, "./lib/foo-bar.js");
            assert_eq!(choices[1].detail, "project module");
            assert_eq!(choices[2].detail, "core module");
        }

        #[test]
        fn values_are_module_ids() {
            let choices = module_choices(&entries());
            let values: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
            assert_eq!(values, vec!["./lib/foo-bar.js", "lodash", "fs"]);
        }

        #[test]
        fn out_of_range_pick_is_internal_error() {
            struct PastEnd;

            impl InteractionAdapter for PastEnd {
                fn choose(&self, _: &str, choices: &[Choice], _: usize) -> InteractionResult<usize> {
                    Ok(choices.len())
                }

                fn show_error(&self, _: &str) {}
            }

            let mut doc = MemoryDocument::new("main();\n");
            let err = require_module(
                &mut doc,
                &PastEnd,
                &entries(),
                Placement::Header,
                &Conventions::default(),
            )
            .unwrap_err();
            assert!(matches!(err, AppreqError::InternalError { .. }));
            assert_eq!(err.error_code(), crate::error::OutputErrorCode::InternalError);
            assert!(!doc.is_modified());
        }
    }

    mod export {
        use super::*;

        #[test]
        fn export_preselects_declaration_under_cursor() {
            let content = "var a = 1;\nfunction b() {}\n";
            let mut doc = MemoryDocument::new(content).with_selection(Span::new(12, 14));
            let ui = ByLabel::new(Some("b"));
            let outcome = insert_export(&mut doc, &ui).unwrap();
            assert_eq!(*ui.seen_preselected.borrow(), Some(1));
            assert!(matches!(outcome, CommandOutcome::Applied(_)));
            assert!(doc.text().ends_with("\nexports.b = b;"));
        }

        #[test]
        fn already_exported_is_unchanged() {
            let mut doc = MemoryDocument::new("function b() {}\nexports.b = b;\n");
            let ui = ByLabel::new(Some("b"));
            assert_eq!(
                insert_export(&mut doc, &ui).unwrap(),
                CommandOutcome::Unchanged
            );
        }

        #[test]
        fn nothing_to_export() {
            let mut doc = MemoryDocument::new("main();\n");
            let ui = ByLabel::new(Some("b"));
            assert_eq!(
                insert_export(&mut doc, &ui).unwrap(),
                CommandOutcome::Unchanged
            );
            assert!(ui.seen_preselected.borrow().is_none());
        }
    }

    #[test]
    fn header_is_inserted_at_top() {
        let mut doc = MemoryDocument::new("main();\n");
        insert_header(&mut doc, "Acme").unwrap();
        assert!(doc.text().starts_with("/**\n * Copyright "));
        assert!(doc.text().ends_with("'use strict';\nmain();\n"));
    }

    #[test]
    fn missing_project_root_is_shown() {
        let dir = tempfile::TempDir::new().unwrap();
        let ui = ByLabel::new(None);
        let err = resolve_catalog(
            &dir.path().join("a.js"),
            &SettingsLoader::isolated(),
            &ui,
        )
        .unwrap_err();
        assert!(matches!(err, AppreqError::NoProjectRoot { .. }));
        assert_eq!(ui.errors.borrow().len(), 1);
    }
}
