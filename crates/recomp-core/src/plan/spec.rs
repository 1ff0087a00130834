//! The planner's output.

use std::path::PathBuf;
use std::sync::Arc;

use crate::graph::{CompiledUnitId, DependencyGraph, UnitSet};

/// Why incremental compilation was judged unsafe.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FullRebuildCause {
    /// Name of the rule or condition that fired
    pub rule: String,
    /// Offending unit, when the condition is tied to one
    pub unit: Option<CompiledUnitId>,
    /// Source file the offending change was reported for
    pub source: Option<PathBuf>,
    /// Human-readable explanation
    pub description: String,
}

impl FullRebuildCause {
    pub fn new(rule: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            unit: None,
            source: None,
            description: description.into(),
        }
    }

    pub fn for_unit(mut self, unit: CompiledUnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl std::fmt::Display for FullRebuildCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (rule: {}", self.description, self.rule)?;
        if let Some(source) = &self.source {
            write!(f, ", source: {}", source.display())?;
        }
        f.write_str(")")
    }
}

/// What the compiler-invocation layer must do for this build.
///
/// When a full-rebuild cause is present the unit sets are void: callers
/// compile everything and must not rely on them.
#[derive(Debug, Clone)]
pub struct RecompilationSpec {
    units_to_compile: UnitSet,
    units_to_delete: UnitSet,
    full_rebuild_cause: Option<FullRebuildCause>,
    initial_graph: Option<Arc<DependencyGraph>>,
}

impl RecompilationSpec {
    pub(crate) fn incremental(
        units_to_compile: UnitSet,
        units_to_delete: UnitSet,
        initial_graph: Option<Arc<DependencyGraph>>,
    ) -> Self {
        Self {
            units_to_compile,
            units_to_delete,
            full_rebuild_cause: None,
            initial_graph,
        }
    }

    pub(crate) fn full_rebuild(
        cause: FullRebuildCause,
        initial_graph: Option<Arc<DependencyGraph>>,
    ) -> Self {
        Self {
            units_to_compile: UnitSet::default(),
            units_to_delete: UnitSet::default(),
            full_rebuild_cause: Some(cause),
            initial_graph,
        }
    }

    /// Units to recompile, in discovery order. Void on a full rebuild.
    pub fn units_to_compile(&self) -> &UnitSet {
        &self.units_to_compile
    }

    /// Removed units whose prior outputs the cleanup step should delete.
    pub fn units_to_delete(&self) -> &UnitSet {
        &self.units_to_delete
    }

    pub fn is_full_rebuild_needed(&self) -> bool {
        self.full_rebuild_cause.is_some()
    }

    pub fn full_rebuild_cause(&self) -> Option<&FullRebuildCause> {
        self.full_rebuild_cause.as_ref()
    }

    /// The graph this plan was computed against, if one was usable.
    pub fn initial_graph(&self) -> Option<&Arc<DependencyGraph>> {
        self.initial_graph.as_ref()
    }

    /// Whether `unit` must be recompiled. Always true on a full rebuild.
    pub fn requires(&self, unit: &CompiledUnitId) -> bool {
        self.is_full_rebuild_needed() || self.units_to_compile.contains(unit)
    }

    /// Incremental plan with nothing to compile or delete.
    pub fn is_up_to_date(&self) -> bool {
        !self.is_full_rebuild_needed()
            && self.units_to_compile.is_empty()
            && self.units_to_delete.is_empty()
    }
}
