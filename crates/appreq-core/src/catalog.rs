//! Project catalog: local files and declared dependencies.
//!
//! The catalog is the list of modules offered for insertion. Local files
//! come first (as `./relative/path.ext`), then manifest dependencies in
//! bucket order, then the configured core modules.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::Settings;
use crate::error::{AppreqError, AppreqResult};
use crate::naming::extension_of;
use crate::types::{DependencyBucket, ModuleEntry, ModuleSource};

/// File marking a project root.
pub const MANIFEST_FILE: &str = "package.json";

// ============================================================================
// Project Root
// ============================================================================

/// Find the directory holding `package.json` for `active_file`.
///
/// Walks up from the file's directory. If nothing is found, the first
/// fallback folder is used, provided it holds a manifest itself. Relative
/// paths are resolved against the current directory, so the returned root
/// is always absolute.
pub fn find_project_root(active_file: &Path, fallback_folders: &[PathBuf]) -> AppreqResult<PathBuf> {
    let active_file = std::path::absolute(active_file)?;
    let start = active_file.parent().unwrap_or(active_file.as_path());
    for dir in start.ancestors() {
        if dir.join(MANIFEST_FILE).is_file() {
            debug!(root = %dir.display(), "project root found above file");
            return Ok(dir.to_path_buf());
        }
    }

    match fallback_folders.first() {
        Some(folder) if folder.join(MANIFEST_FILE).is_file() => {
            debug!(root = %folder.display(), "using fallback project folder");
            Ok(std::path::absolute(folder)?)
        }
        _ => Err(AppreqError::no_project_root(start)),
    }
}

// ============================================================================
// Manifest
// ============================================================================

/// The dependency buckets of `package.json`. Key order is preserved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub optional_dependencies: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub electron_dependencies: IndexMap<String, serde_json::Value>,
}

impl Manifest {
    /// Read `package.json` from `root`.
    pub fn read(root: &Path) -> AppreqResult<Self> {
        let path = root.join(MANIFEST_FILE);
        let json = fs::read_to_string(&path).map_err(|_| AppreqError::file_not_found(&path))?;
        serde_json::from_str(&json).map_err(|e| AppreqError::ManifestParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn bucket(&self, bucket: DependencyBucket) -> &IndexMap<String, serde_json::Value> {
        match bucket {
            DependencyBucket::Dependencies => &self.dependencies,
            DependencyBucket::DevDependencies => &self.dev_dependencies,
            DependencyBucket::OptionalDependencies => &self.optional_dependencies,
            DependencyBucket::ElectronDependencies => &self.electron_dependencies,
        }
    }

    /// Dependency names across buckets; a name keeps its first bucket.
    pub fn dependency_entries(&self) -> Vec<ModuleEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for bucket in DependencyBucket::SCAN_ORDER {
            for name in self.bucket(bucket).keys() {
                if seen.insert(name.as_str()) {
                    entries.push(ModuleEntry::new(
                        name.as_str(),
                        name.as_str(),
                        ModuleSource::Dependency(bucket),
                    ));
                }
            }
        }
        entries
    }
}

// ============================================================================
// Local Files
// ============================================================================

/// Files under `root` whose extension is configured.
///
/// Excluded directory names apply only directly under `root`. Hidden files
/// are skipped, as is `active_file` itself. An unreadable `root` is an
/// error; unreadable entries below it are skipped.
pub fn local_files(
    root: &Path,
    active_file: Option<&Path>,
    settings: &Settings,
) -> AppreqResult<Vec<ModuleEntry>> {
    let active_rel = active_file.and_then(|file| relative_to_root(root, file));
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() == 1
                && entry.file_type().is_dir()
                && settings
                    .exclude_dirs
                    .iter()
                    .any(|d| entry.file_name().to_string_lossy() == d.as_str()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(AppreqError::Io {
                    message: format!("cannot read {}: {err}", root.display()),
                });
            }
            Err(err) => {
                trace!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if active_rel.as_deref() == Some(rel) {
            continue;
        }

        if !settings
            .extensions
            .iter()
            .any(|ext| ext.as_str() == extension_of(&name))
        {
            continue;
        }

        let rel_str = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push(ModuleEntry::new(
            name,
            format!("./{rel_str}"),
            ModuleSource::LocalFile,
        ));
    }

    debug!(count = entries.len(), root = %root.display(), "collected local files");
    Ok(entries)
}

/// `file` relative to `root`, comparing canonical paths when they exist.
fn relative_to_root(root: &Path, file: &Path) -> Option<PathBuf> {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let file = fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    file.strip_prefix(&root).ok().map(Path::to_path_buf)
}

// ============================================================================
// Catalog
// ============================================================================

/// All candidate modules for one file.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub project_root: PathBuf,
    pub entries: Vec<ModuleEntry>,
}

impl Catalog {
    /// Build the catalog for a file in an already-resolved project root.
    pub fn build(root: &Path, active_file: Option<&Path>, settings: &Settings) -> AppreqResult<Self> {
        let mut entries = local_files(root, active_file, settings)?;
        entries.extend(Manifest::read(root)?.dependency_entries());
        entries.extend(
            settings
                .core_modules
                .iter()
                .map(|name| ModuleEntry::new(name.as_str(), name.as_str(), ModuleSource::Core)),
        );
        Ok(Catalog {
            project_root: root.to_path_buf(),
            entries,
        })
    }

    /// Resolve the project root for `active_file`, then build the catalog.
    pub fn for_file(active_file: &Path, settings: &Settings) -> AppreqResult<Self> {
        let root = find_project_root(active_file, &settings.project_folders)?;
        Catalog::build(&root, Some(active_file), settings)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
