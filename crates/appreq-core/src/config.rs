//! Settings loading and resolution.
//!
//! Settings are read once at the command boundary and then passed by value
//! into the pure naming, classification and merge functions. Nothing in the
//! core reads configuration on its own.
//!
//! ## Precedence (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. User settings file (`<config dir>/appreq/settings.json`)
//! 3. Project settings file (`.appreq.json` in the project root)
//! 4. File named by `APPREQ_SETTINGS`
//! 5. File passed with `--settings`
//!
//! Each layer only overrides the keys it sets.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppreqError, AppreqResult};
use crate::naming::NamingRules;

/// Name of the per-project settings file.
pub const PROJECT_SETTINGS_FILE: &str = ".appreq.json";

/// Environment variable naming an extra settings file.
pub const SETTINGS_ENV_VAR: &str = "APPREQ_SETTINGS";

const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", "bower_components", ".git"];

const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".json", ".css", ".less", ".scss"];

const DEFAULT_CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

// ============================================================================
// Settings
// ============================================================================

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory names skipped at the top level of the project walk.
    #[serde(rename = "excludeDirs")]
    pub exclude_dirs: Vec<String>,
    /// File extensions (with leading dot) offered from the project walk.
    pub extensions: Vec<String>,
    /// Modules treated as core: lower-case identifiers, sorted first.
    pub core_modules: Vec<String>,
    /// Alias rules: pattern → replacement text per capture group, in order.
    pub alias: IndexMap<String, Vec<String>>,
    /// Extension → prefix prepended to derived identifiers.
    pub prefix: IndexMap<String, String>,
    /// Fallback project roots when no `package.json` is found above the file.
    pub project_folders: Vec<PathBuf>,
    /// Holder named in the copyright header.
    pub copyright_holder: String,
}

impl Default for Settings {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Settings {
            exclude_dirs: strings(DEFAULT_EXCLUDE_DIRS),
            extensions: strings(DEFAULT_EXTENSIONS),
            core_modules: strings(DEFAULT_CORE_MODULES),
            alias: IndexMap::new(),
            prefix: IndexMap::new(),
            project_folders: Vec::new(),
            copyright_holder: String::new(),
        }
    }
}

/// One settings file: every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsLayer {
    #[serde(rename = "excludeDirs")]
    pub exclude_dirs: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub core_modules: Option<Vec<String>>,
    pub alias: Option<IndexMap<String, Vec<String>>>,
    pub prefix: Option<IndexMap<String, String>>,
    pub project_folders: Option<Vec<PathBuf>>,
    pub copyright_holder: Option<String>,
}

impl SettingsLayer {
    /// Parse a layer from JSON text. `path` is only used in error messages.
    pub fn parse(json: &str, path: &Path) -> AppreqResult<Self> {
        serde_json::from_str(json).map_err(|e| AppreqError::SettingsParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Read and parse a layer from disk.
    pub fn read(path: &Path) -> AppreqResult<Self> {
        let json = fs::read_to_string(path).map_err(|_| AppreqError::file_not_found(path))?;
        SettingsLayer::parse(&json, path)
    }
}

impl Settings {
    /// Override every key the layer sets.
    pub fn apply_layer(&mut self, layer: SettingsLayer) {
        if let Some(v) = layer.exclude_dirs {
            self.exclude_dirs = v;
        }
        if let Some(v) = layer.extensions {
            self.extensions = v;
        }
        if let Some(v) = layer.core_modules {
            self.core_modules = v;
        }
        if let Some(v) = layer.alias {
            self.alias = v;
        }
        if let Some(v) = layer.prefix {
            self.prefix = v;
        }
        if let Some(v) = layer.project_folders {
            self.project_folders = v;
        }
        if let Some(v) = layer.copyright_holder {
            self.copyright_holder = v;
        }
    }
}

// ============================================================================
// Configuration Sources
// ============================================================================

/// Settings layer source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// User-wide settings file.
    UserFile = 1,
    /// `.appreq.json` in the project root.
    ProjectFile = 2,
    /// File named by the environment variable.
    EnvVar = 3,
    /// File given on the command line (highest precedence).
    CliFlag = 4,
}

/// A settings file that contributed to the resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedLayer {
    pub source: ConfigSource,
    pub path: PathBuf,
}

/// Settings together with the files they were assembled from.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    pub layers: Vec<LoadedLayer>,
}

/// Locates and layers settings files.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    user_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    cli_file: Option<PathBuf>,
    cli_project_folders: Vec<PathBuf>,
}

impl SettingsLoader {
    /// Loader looking at the user config dir and `APPREQ_SETTINGS`.
    pub fn from_env() -> Self {
        SettingsLoader {
            user_file: dirs::config_dir().map(|d| d.join("appreq").join("settings.json")),
            env_file: std::env::var_os(SETTINGS_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            cli_file: None,
            cli_project_folders: Vec::new(),
        }
    }

    /// Loader with no implicit files; only defaults and explicit layers.
    pub fn isolated() -> Self {
        SettingsLoader::default()
    }

    /// Add the file passed on the command line.
    pub fn with_cli_file(mut self, path: Option<PathBuf>) -> Self {
        self.cli_file = path;
        self
    }

    /// Fallback project folders given on the command line; they replace
    /// `project_folders` from every file layer.
    pub fn with_project_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.cli_project_folders = folders;
        self
    }

    /// Resolve settings. The project layer is read when `project_root` is
    /// known and contains `.appreq.json`.
    ///
    /// A missing user or project file is skipped; a missing file that was
    /// named explicitly is an error.
    pub fn load(&self, project_root: Option<&Path>) -> AppreqResult<ResolvedSettings> {
        let mut settings = Settings::default();
        let mut layers = Vec::new();

        let mut apply = |source: ConfigSource, path: &Path, required: bool| -> AppreqResult<()> {
            if !required && !path.is_file() {
                return Ok(());
            }
            let layer = SettingsLayer::read(path)?;
            debug!(source = ?source, path = %path.display(), "applying settings layer");
            settings.apply_layer(layer);
            layers.push(LoadedLayer {
                source,
                path: path.to_path_buf(),
            });
            Ok(())
        };

        if let Some(path) = &self.user_file {
            apply(ConfigSource::UserFile, path, false)?;
        }
        if let Some(root) = project_root {
            apply(
                ConfigSource::ProjectFile,
                &root.join(PROJECT_SETTINGS_FILE),
                false,
            )?;
        }
        if let Some(path) = &self.env_file {
            apply(ConfigSource::EnvVar, path, true)?;
        }
        if let Some(path) = &self.cli_file {
            apply(ConfigSource::CliFlag, path, true)?;
        }
        if !self.cli_project_folders.is_empty() {
            settings.project_folders = self.cli_project_folders.clone();
        }

        Ok(ResolvedSettings { settings, layers })
    }
}

// ============================================================================
// Compiled Conventions
// ============================================================================

/// Set of module names treated as core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreModuleSet(HashSet<String>);

impl CoreModuleSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CoreModuleSet(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, module: &str) -> bool {
        self.0.contains(module)
    }
}

/// Everything the pure functions need from settings, compiled once.
#[derive(Debug, Clone)]
pub struct Conventions {
    pub core: CoreModuleSet,
    pub naming: NamingRules,
}

impl Conventions {
    pub fn from_settings(settings: &Settings) -> AppreqResult<Self> {
        Ok(Conventions {
            core: CoreModuleSet::new(settings.core_modules.iter().cloned()),
            naming: NamingRules::compile(&settings.alias, &settings.prefix)?,
        })
    }
}

impl Default for Conventions {
    /// Default core module list with no alias or prefix rules.
    fn default() -> Self {
        Conventions {
            core: CoreModuleSet::new(DEFAULT_CORE_MODULES.iter().copied()),
            naming: NamingRules::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
