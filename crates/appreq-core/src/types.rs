//! Common types shared between the catalog, merge and output modules.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into a document buffer.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span. The bounds are reordered if given backwards.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Span { start, end }
        } else {
            Span {
                start: end,
                end: start,
            }
        }
    }

    /// Zero-width span at `offset`.
    pub fn empty_at(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Check if this span intersects another.
    ///
    /// Unlike a strict overlap test, touching spans and empty spans that
    /// sit on a boundary count as intersecting, so a caret at the end of a
    /// line still selects that line.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Catalog entries
// ============================================================================

/// Manifest bucket a dependency was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyBucket {
    Dependencies,
    DevDependencies,
    OptionalDependencies,
    ElectronDependencies,
}

impl DependencyBucket {
    /// Buckets in scan order. The first bucket declaring a key wins.
    pub const SCAN_ORDER: [DependencyBucket; 4] = [
        DependencyBucket::Dependencies,
        DependencyBucket::DevDependencies,
        DependencyBucket::OptionalDependencies,
        DependencyBucket::ElectronDependencies,
    ];

    /// Key of the bucket inside `package.json`.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyBucket::Dependencies => "dependencies",
            DependencyBucket::DevDependencies => "devDependencies",
            DependencyBucket::OptionalDependencies => "optionalDependencies",
            DependencyBucket::ElectronDependencies => "electronDependencies",
        }
    }

    /// Human-readable label shown next to a dependency in a choice list.
    pub fn label(&self) -> &'static str {
        match self {
            DependencyBucket::Dependencies => "project module",
            DependencyBucket::DevDependencies => "dev module",
            DependencyBucket::OptionalDependencies => "optional module",
            DependencyBucket::ElectronDependencies => "electron module",
        }
    }
}

/// Where a catalog entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "bucket", rename_all = "snake_case")]
pub enum ModuleSource {
    /// A file inside the project tree.
    LocalFile,
    /// A key of one of the manifest dependency buckets.
    Dependency(DependencyBucket),
    /// A configured always-available core module.
    Core,
}

impl ModuleSource {
    pub fn label(&self) -> &'static str {
        match self {
            ModuleSource::LocalFile => "local file",
            ModuleSource::Dependency(bucket) => bucket.label(),
            ModuleSource::Core => "core module",
        }
    }
}

/// One candidate module offered for insertion.
///
/// `module_id` is either a relative path (`./foo/bar.js`), a root-absolute
/// path (`/foo/bar`) or a bare package name (`lodash`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Short name shown in the choice list.
    pub display_name: String,
    /// The string written inside `require(...)`.
    pub module_id: String,
    /// Origin of the entry.
    pub source: ModuleSource,
}

impl ModuleEntry {
    pub fn new(
        display_name: impl Into<String>,
        module_id: impl Into<String>,
        source: ModuleSource,
    ) -> Self {
        ModuleEntry {
            display_name: display_name.into(),
            module_id: module_id.into(),
            source,
        }
    }
}
