//! Import-line classification.
//!
//! Lines are matched against a small fixed set of shapes; there is no
//! tokenizer. An import line is
//!
//! ```text
//! [// ][/* ]var Name = [app]require('module')[.prop];
//! ```
//!
//! where a lower-case first letter of `Name` marks a core import and an
//! upper-case one a non-core import. Two variants exist: the strict shape
//! used when scanning the document header (no indentation before `var`),
//! and the indented shape used when growing a block around an insertion
//! point.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const IMPORT_TAIL: &str = r"\w* = (?:app)?[rR]equire\('[^ ']*'\)(?:\.\w*)?;";

fn import_pattern(first: &str, indented: bool) -> Regex {
    let lead = if indented {
        r"^(?://)?(?:/\*)?[ \t]*var "
    } else {
        r"^(?:// *)?(?:/\* *)?var "
    };
    Regex::new(&format!("{lead}{first}{IMPORT_TAIL}")).expect("import pattern is valid")
}

static CORE_STRICT: LazyLock<Regex> = LazyLock::new(|| import_pattern("[a-z]", false));
static NON_CORE_STRICT: LazyLock<Regex> = LazyLock::new(|| import_pattern("[A-Z]", false));
static CORE_INDENTED: LazyLock<Regex> = LazyLock::new(|| import_pattern("[a-z]", true));
static NON_CORE_INDENTED: LazyLock<Regex> = LazyLock::new(|| import_pattern("[A-Z]", true));

static LINT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\* eslint-disable.*\*/$").expect("lint pattern is valid"));

static BOUND_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*var (\w*)").expect("bound name pattern is valid"));

static REQUIRED_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:app)?[rR]equire\('([^ ']*)'\)").expect("module pattern is valid")
});

// ============================================================================
// Types
// ============================================================================

/// Which run of the header an import belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStyle {
    /// Bound to a lower-case identifier; sorted before non-core imports.
    Core,
    /// Bound to a capitalised identifier.
    NonCore,
}

impl ImportStyle {
    pub fn for_module(is_core: bool) -> Self {
        if is_core {
            ImportStyle::Core
        } else {
            ImportStyle::NonCore
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            ImportStyle::Core => ImportStyle::NonCore,
            ImportStyle::NonCore => ImportStyle::Core,
        }
    }
}

/// Whether leading indentation is accepted before `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Header-scan shape: `var` at column zero (after optional comment markers).
    Strict,
    /// Block-merge shape: spaces or tabs allowed before `var`.
    Allowed,
}

/// Shape of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "style", rename_all = "snake_case")]
pub enum LineKind {
    Import(ImportStyle),
    LintDirective,
    Blank,
    Other,
}

/// Classification of a line plus what it binds and requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineClass {
    pub kind: LineKind,
    /// Identifier after `var`, for import lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// String inside `require('...')`, for import lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl LineClass {
    pub fn is_import_of(&self, style: ImportStyle) -> bool {
        self.kind == LineKind::Import(style)
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Check a line against the import shape of `style`.
pub fn matches_import(line: &str, style: ImportStyle, indent: Indent) -> bool {
    let pattern: &Regex = match (style, indent) {
        (ImportStyle::Core, Indent::Strict) => &*CORE_STRICT,
        (ImportStyle::NonCore, Indent::Strict) => &*NON_CORE_STRICT,
        (ImportStyle::Core, Indent::Allowed) => &*CORE_INDENTED,
        (ImportStyle::NonCore, Indent::Allowed) => &*NON_CORE_INDENTED,
    };
    pattern.is_match(line)
}

/// `/* eslint-disable ... */` on a line of its own.
pub fn is_lint_directive(line: &str) -> bool {
    LINT_DIRECTIVE.is_match(line)
}

/// Classify a line using the strict header shapes.
pub fn classify(line: &str) -> LineClass {
    let kind = if matches_import(line, ImportStyle::NonCore, Indent::Strict) {
        LineKind::Import(ImportStyle::NonCore)
    } else if matches_import(line, ImportStyle::Core, Indent::Strict) {
        LineKind::Import(ImportStyle::Core)
    } else if is_lint_directive(line) {
        LineKind::LintDirective
    } else if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Other
    };

    let (variable, module) = match kind {
        LineKind::Import(_) => (
            bound_name(line),
            REQUIRED_MODULE
                .captures(line)
                .map(|caps| caps[1].to_string()),
        ),
        _ => (None, None),
    };

    LineClass {
        kind,
        variable,
        module,
    }
}

/// Identifier following the last `var ` on the line, if any.
pub fn bound_name(line: &str) -> Option<String> {
    BOUND_NAME.captures(line).map(|caps| caps[1].to_string())
}

/// Case-insensitive sort and dedup key of a block line.
///
/// The bound name, lower-cased; lines without `var ` sort by their whole
/// lower-cased text.
pub fn sort_key(line: &str) -> String {
    let lower = line.to_lowercase();
    match BOUND_NAME.captures(&lower) {
        Some(caps) => caps[1].to_string(),
        None => lower,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod shapes {
        use super::*;

        #[test]
        fn core_and_non_core_lines() {
            let core = classify("var fs = require('fs');");
            assert_eq!(core.kind, LineKind::Import(ImportStyle::Core));
            assert_eq!(core.variable.as_deref(), Some("fs"));
            assert_eq!(core.module.as_deref(), Some("fs"));

            let non_core = classify("var Lodash = require('lodash');");
            assert_eq!(non_core.kind, LineKind::Import(ImportStyle::NonCore));
            assert!(non_core.is_import_of(ImportStyle::NonCore));
        }

        #[test]
        fn app_require_with_property_access() {
            let class = classify("var Config = appRequire('lib/config').settings;");
            assert_eq!(class.kind, LineKind::Import(ImportStyle::NonCore));
            assert_eq!(class.module.as_deref(), Some("lib/config"));
        }

        #[test]
        fn commented_out_imports_still_count() {
            assert_eq!(
                classify("// var Foo = require('foo');").kind,
                LineKind::Import(ImportStyle::NonCore)
            );
            assert_eq!(
                classify("/* var path = require('path'); */").kind,
                LineKind::Import(ImportStyle::Core)
            );
        }

        #[test]
        fn lint_directive_blank_and_other() {
            assert_eq!(
                classify("/* eslint-disable no-unused-vars */").kind,
                LineKind::LintDirective
            );
            assert_eq!(classify("   ").kind, LineKind::Blank);
            assert_eq!(classify("").kind, LineKind::Blank);
            assert_eq!(classify("function main() {").kind, LineKind::Other);
            assert_eq!(classify("var x = 1;").kind, LineKind::Other);
        }

        #[test]
        fn spacing_must_be_exact() {
            assert_eq!(classify("var Foo=require('foo');").kind, LineKind::Other);
            assert_eq!(classify("var Foo = require(\"foo\");").kind, LineKind::Other);
        }
    }

    mod indentation {
        use super::*;

        #[test]
        fn strict_rejects_indentation() {
            let line = "    var Foo = require('foo');";
            assert!(!matches_import(line, ImportStyle::NonCore, Indent::Strict));
            assert!(matches_import(line, ImportStyle::NonCore, Indent::Allowed));
            assert!(matches_import(
                "\tvar fs = require('fs');",
                ImportStyle::Core,
                Indent::Allowed
            ));
        }

        #[test]
        fn styles_do_not_cross_match() {
            let line = "var fs = require('fs');";
            assert!(!matches_import(line, ImportStyle::NonCore, Indent::Allowed));
        }
    }

    mod keys {
        use super::*;

        #[test]
        fn sort_key_is_lower_cased_binding() {
            assert_eq!(sort_key("var Lodash = require('lodash');"), "lodash");
            assert_eq!(sort_key("  var fs = require('fs');"), "fs");
            assert_eq!(sort_key("Something Else"), "something else");
        }

        #[test]
        fn bound_name_uses_last_var() {
            assert_eq!(
                bound_name("// var A = 1; var B = require('b');").as_deref(),
                Some("B")
            );
            assert_eq!(bound_name("const x = 1;"), None);
        }
    }

    #[test]
    fn style_helpers() {
        assert_eq!(ImportStyle::for_module(true), ImportStyle::Core);
        assert_eq!(ImportStyle::Core.opposite(), ImportStyle::NonCore);
    }
}
