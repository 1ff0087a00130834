//! Types for change classification.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::graph::CompiledUnitId;

/// How a unit changed since the last successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => f.write_str("added"),
            ChangeKind::Modified => f.write_str("modified"),
            ChangeKind::Removed => f.write_str("removed"),
        }
    }
}

/// A raw, file-level notification from the change detector.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A change to one compiled unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub unit: CompiledUnitId,
    pub kind: ChangeKind,
    /// Source file the change was reported for, when it came from one.
    pub source: Option<PathBuf>,
}

impl ChangeEvent {
    pub fn new(unit: impl Into<CompiledUnitId>, kind: ChangeKind) -> Self {
        Self {
            unit: unit.into(),
            kind,
            source: None,
        }
    }

    pub fn added(unit: impl Into<CompiledUnitId>) -> Self {
        Self::new(unit, ChangeKind::Added)
    }

    pub fn modified(unit: impl Into<CompiledUnitId>) -> Self {
        Self::new(unit, ChangeKind::Modified)
    }

    pub fn removed(unit: impl Into<CompiledUnitId>) -> Self {
        Self::new(unit, ChangeKind::Removed)
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Two changes to the same unit in one window that cannot be reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeConflict {
    pub unit: CompiledUnitId,
    /// Kind recorded before the conflicting event arrived
    pub earlier: ChangeKind,
    /// Kind of the conflicting event
    pub later: ChangeKind,
    pub source: Option<PathBuf>,
}

impl std::fmt::Display for ChangeConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unit {} was reported {} and then {} in the same change window",
            self.unit, self.earlier, self.later
        )
    }
}

/// Mapping from source files to the compiled units they produce.
///
/// One source may produce several units (nested or local types).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SourceMapping {
    sources: IndexMap<PathBuf, Vec<CompiledUnitId>, FxBuildHasher>,
}

impl SourceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the units produced by `source`, replacing any previous entry.
    pub fn insert(
        &mut self,
        source: impl Into<PathBuf>,
        units: impl IntoIterator<Item = impl Into<CompiledUnitId>>,
    ) -> &mut Self {
        self.sources
            .insert(source.into(), units.into_iter().map(Into::into).collect());
        self
    }

    pub fn units_for(&self, source: &Path) -> Option<&[CompiledUnitId]> {
        self.sources.get(source).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
