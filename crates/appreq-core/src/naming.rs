//! Identifier naming for required modules.
//!
//! Turns a module id (`./lib/foo-bar.js`, `lodash`, `/styles/button.css`)
//! into the variable name it is bound to:
//!
//! 1. remember the extension (for the prefix table)
//! 2. keep the last path segment and cut it at its first `.`
//! 3. collapse `-`/`_`/punctuation runs into camelCase
//! 4. capitalise the first letter unless the module is core
//! 5. apply the first matching alias rule
//! 6. prepend the prefix configured for the extension
//!
//! Naming never fails: odd input yields an odd but usable identifier.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::error::{AppreqError, AppreqResult};

/// Upper bound on camelCase passes, so adversarial input terminates.
pub const MAX_NORMALIZE_PASSES: usize = 100;

/// Letters, digits, one optional separator, one optional word char, rest.
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\W\d_]+)(\d*)([\W_]?)(\w?)(.*)").expect("separator pattern is valid")
});

// ============================================================================
// Rules
// ============================================================================

/// A compiled alias rule.
///
/// When `pattern` matches at the start of an identifier, capture group
/// `i + 1` is replaced with `replacements[i]`.
#[derive(Debug, Clone)]
pub struct AliasRule {
    pub pattern: Regex,
    pub replacements: Vec<String>,
}

impl AliasRule {
    pub fn new(pattern: &str, replacements: Vec<String>) -> AppreqResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| AppreqError::InvalidAliasPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(AliasRule {
            pattern,
            replacements,
        })
    }

    /// Rewrite `ident` if the rule matches at its start.
    fn apply(&self, ident: &str) -> Option<String> {
        let caps = self.pattern.captures(ident)?;
        if caps.get(0).is_none_or(|m| m.start() != 0) {
            return None;
        }

        // Last group first so earlier offsets stay valid.
        let mut out = ident.to_string();
        for (i, replacement) in self.replacements.iter().enumerate().rev() {
            match caps.get(i + 1) {
                Some(group) => out.replace_range(group.start()..group.end(), replacement),
                None => trace!(group = i + 1, "alias group did not participate"),
            }
        }
        Some(out)
    }
}

/// Alias rules and the extension prefix table.
#[derive(Debug, Clone, Default)]
pub struct NamingRules {
    pub aliases: Vec<AliasRule>,
    pub prefixes: IndexMap<String, String>,
}

impl NamingRules {
    /// Compile the `alias` and `prefix` settings, keeping alias order.
    pub fn compile(
        alias: &IndexMap<String, Vec<String>>,
        prefix: &IndexMap<String, String>,
    ) -> AppreqResult<Self> {
        let aliases = alias
            .iter()
            .map(|(pattern, replacements)| AliasRule::new(pattern, replacements.clone()))
            .collect::<AppreqResult<Vec<_>>>()?;
        Ok(NamingRules {
            aliases,
            prefixes: prefix.clone(),
        })
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Derive the variable name bound to `module`.
pub fn derive_identifier(module: &str, is_core: bool, rules: &NamingRules) -> String {
    let extension = extension_of(module);

    let segment = module.rsplit('/').next().unwrap_or(module);
    let stem = match segment.find('.') {
        Some(dot) => &segment[..dot],
        None => segment,
    };

    let mut ident = camel_case(stem);

    if !is_core {
        ident = capitalize_first(&ident);
    }

    if let Some(aliased) = rules.aliases.iter().find_map(|rule| rule.apply(&ident)) {
        ident = aliased;
    }

    if let Some(prefix) = rules.prefixes.get(extension) {
        ident.insert_str(0, prefix);
    }

    ident
}

/// Collapse separator runs into camelCase, one run per pass.
///
/// Anything before the first letter is dropped, and a word character that
/// follows a separator or a digit run is upper-cased.
pub fn camel_case(segment: &str) -> String {
    let mut current = segment.to_string();
    for _ in 0..MAX_NORMALIZE_PASSES {
        let Some(caps) = SEPARATOR_RUN.captures(&current) else {
            break;
        };
        let next = format!(
            "{}{}{}{}",
            &caps[1],
            &caps[2],
            caps[4].to_uppercase(),
            &caps[5]
        );
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Extension of the last path segment, including the dot.
///
/// Leading dots of the segment do not start an extension, so `.eslintrc`
/// has none.
pub fn extension_of(module: &str) -> &str {
    let segment = module.rsplit('/').next().unwrap_or(module);
    let body = segment.trim_start_matches('.');
    let body_start = segment.len() - body.len();
    match body.rfind('.') {
        Some(dot) => &segment[body_start + dot..],
        None => "",
    }
}

fn capitalize_first(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(alias: &[(&str, &[&str])], prefix: &[(&str, &str)]) -> NamingRules {
        let alias = alias
            .iter()
            .map(|(p, r)| (p.to_string(), r.iter().map(|s| s.to_string()).collect()))
            .collect();
        let prefix = prefix
            .iter()
            .map(|(e, p)| (e.to_string(), p.to_string()))
            .collect();
        NamingRules::compile(&alias, &prefix).unwrap()
    }

    mod derive {
        use super::*;

        #[test]
        fn local_file_is_capitalized_camel_case() {
            let name = derive_identifier("./lib/foo-bar.js", false, &NamingRules::default());
            assert_eq!(name, "FooBar");
        }

        #[test]
        fn core_module_keeps_lower_case() {
            assert_eq!(
                derive_identifier("lodash", true, &NamingRules::default()),
                "lodash"
            );
            assert_eq!(
                derive_identifier("child_process", true, &NamingRules::default()),
                "childProcess"
            );
        }

        #[test]
        fn cuts_segment_at_first_dot() {
            assert_eq!(
                derive_identifier("jquery.min.js", false, &NamingRules::default()),
                "Jquery"
            );
        }

        #[test]
        fn scoped_package_uses_last_segment() {
            assert_eq!(
                derive_identifier("@babel/core", false, &NamingRules::default()),
                "Core"
            );
        }

        #[test]
        fn alias_replaces_group() {
            let rules = rules(&[("^Foo(Bar)$", &["Baz"])], &[]);
            assert_eq!(derive_identifier("./foo-bar.js", false, &rules), "FooBaz");
        }

        #[test]
        fn first_matching_alias_wins() {
            let rules = rules(
                &[("^(Re)act$", &["Pre"]), ("^(React)$", &["Nope"])],
                &[],
            );
            assert_eq!(derive_identifier("react", false, &rules), "Preact");
        }

        #[test]
        fn alias_must_match_at_start() {
            let rules = rules(&[("(Bar)", &["Baz"])], &[]);
            assert_eq!(derive_identifier("foo-bar", false, &rules), "FooBar");
            assert_eq!(derive_identifier("bar-foo", false, &rules), "BazFoo");
        }

        #[test]
        fn alias_replaces_multiple_groups_back_to_front() {
            let rules = rules(&[("^(Long)Name(Here)$", &["L", "H"])], &[]);
            assert_eq!(derive_identifier("long-name-here", false, &rules), "LNameH");
        }

        #[test]
        fn prefix_applies_by_extension() {
            let rules = rules(&[], &[(".css", "style")]);
            assert_eq!(
                derive_identifier("./components/button.css", false, &rules),
                "styleButton"
            );
            assert_eq!(derive_identifier("./button.js", false, &rules), "Button");
        }

        #[test]
        fn degenerate_input_does_not_panic() {
            let rules = NamingRules::default();
            assert_eq!(derive_identifier("", false, &rules), "");
            assert_eq!(derive_identifier("./", false, &rules), "");
            assert_eq!(derive_identifier("123", false, &rules), "123");
            assert_eq!(derive_identifier(".eslintrc", false, &rules), "");
        }
    }

    mod camel_case_tests {
        use super::*;

        #[test]
        fn kebab_and_snake() {
            assert_eq!(camel_case("foo-bar-baz"), "fooBarBaz");
            assert_eq!(camel_case("foo_bar"), "fooBar");
            assert_eq!(camel_case("foo--bar"), "fooBar");
        }

        #[test]
        fn digits_upper_case_following_letter() {
            assert_eq!(camel_case("md5sum"), "md5Sum");
            assert_eq!(camel_case("es6-promise"), "es6Promise");
        }

        #[test]
        fn leading_non_letters_are_dropped() {
            assert_eq!(camel_case("_private"), "private");
            assert_eq!(camel_case("2d-canvas"), "dCanvas");
        }

        #[test]
        fn long_input_terminates() {
            let input = "a-".repeat(500);
            let out = camel_case(&input);
            assert!(out.starts_with("aAAA"));
            assert!(out.contains('-'));
        }
    }

    mod extension_tests {
        use super::*;

        #[test]
        fn extension_of_paths() {
            assert_eq!(extension_of("./lib/foo.js"), ".js");
            assert_eq!(extension_of("./a.b/c"), "");
            assert_eq!(extension_of("jquery.min.js"), ".js");
            assert_eq!(extension_of(".eslintrc"), "");
            assert_eq!(extension_of("lodash"), "");
        }
    }

    #[test]
    fn invalid_alias_is_reported() {
        let err = AliasRule::new("(unclosed", vec![]).unwrap_err();
        assert!(matches!(err, AppreqError::InvalidAliasPattern { .. }));
    }
}
