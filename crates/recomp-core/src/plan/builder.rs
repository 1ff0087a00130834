//! Closure algorithm turning a change set into a recompilation spec.

use std::sync::Arc;

use super::spec::{FullRebuildCause, RecompilationSpec};
use crate::change::{ChangeKind, ChangeSet};
use crate::graph::closure::{close_parallel, close_sequential};
use crate::graph::{DependencyGraph, UnitSet};
use crate::rules::{InvalidationVerdict, RuleSet};

/// Computes the recompilation spec for one change set.
///
/// Pure: neither the graph nor the change set is modified.
pub struct RecompilationSpecBuilder<'a> {
    graph: Option<Arc<DependencyGraph>>,
    rules: &'a RuleSet,
    pool: Option<&'a rayon::ThreadPool>,
}

impl<'a> RecompilationSpecBuilder<'a> {
    pub fn new(graph: Arc<DependencyGraph>, rules: &'a RuleSet) -> Self {
        Self {
            graph: Some(graph),
            rules,
            pool: None,
        }
    }

    /// A builder for when the prior graph could not be loaded.
    ///
    /// Every non-empty change set then forces a full rebuild.
    pub fn without_graph(rules: &'a RuleSet) -> Self {
        Self {
            graph: None,
            rules,
            pool: None,
        }
    }

    /// Expand the closure level by level on `pool`.
    pub fn with_pool(mut self, pool: &'a rayon::ThreadPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn build(&self, changes: &ChangeSet) -> RecompilationSpec {
        if let Some(conflict) = changes.conflicts().next() {
            let mut cause = FullRebuildCause::new("conflicting-change", conflict.to_string())
                .for_unit(conflict.unit.clone());
            if let Some(source) = &conflict.source {
                cause = cause.with_source(source.clone());
            }
            return self.full_rebuild(cause);
        }

        let Some(graph) = &self.graph else {
            return match changes.events().next() {
                Some(event) => {
                    let cause = FullRebuildCause::new(
                        "missing-graph",
                        format!(
                            "no usable dependency graph; cannot plan {} unit {} incrementally",
                            event.kind, event.unit
                        ),
                    )
                    .for_unit(event.unit.clone());
                    self.full_rebuild(cause)
                }
                None => RecompilationSpec::incremental(UnitSet::default(), UnitSet::default(), None),
            };
        };

        for event in changes.events() {
            if let InvalidationVerdict::FullRebuild(cause) = self.rules.evaluate(event, graph) {
                return self.full_rebuild(cause);
            }
        }

        let mut seeds = Vec::with_capacity(changes.len());
        let mut units_to_delete = UnitSet::default();
        for event in changes.events() {
            if event.kind == ChangeKind::Removed {
                units_to_delete.insert(event.unit.clone());
            }
            seeds.push(event.unit.clone());
        }

        let units_to_compile = match self.pool {
            Some(pool) => close_parallel(graph, seeds, pool),
            None => close_sequential(graph, seeds),
        };

        tracing::info!(
            "incremental plan: {} changed units, {} to compile, {} to delete",
            changes.len(),
            units_to_compile.len(),
            units_to_delete.len()
        );

        RecompilationSpec::incremental(units_to_compile, units_to_delete, Some(Arc::clone(graph)))
    }

    fn full_rebuild(&self, cause: FullRebuildCause) -> RecompilationSpec {
        tracing::warn!("full rebuild required: {}", cause);
        RecompilationSpec::full_rebuild(cause, self.graph.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeEvent;
    use crate::graph::CompiledUnitId;

    fn id(name: &str) -> CompiledUnitId {
        CompiledUnitId::new(name)
    }

    fn units(spec: &RecompilationSpec) -> Vec<CompiledUnitId> {
        let mut units: Vec<_> = spec.units_to_compile().iter().cloned().collect();
        units.sort();
        units
    }

    /// A depends on B, B depends on C; Z stands alone.
    fn graph() -> Arc<DependencyGraph> {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id("A"), id("B"));
        graph.add_dependency(id("B"), id("C"));
        graph.add_unit(id("Z"));
        Arc::new(graph)
    }

    #[test]
    fn test_empty_change_set() {
        let rules = RuleSet::default();
        let spec = RecompilationSpecBuilder::new(graph(), &rules).build(&ChangeSet::new());
        assert!(spec.is_up_to_date());
        assert!(spec.initial_graph().is_some());
    }

    #[test]
    fn test_chain_closure_order() {
        let rules = RuleSet::default();
        let changes = ChangeSet::from_events([ChangeEvent::modified("C")]);
        let spec = RecompilationSpecBuilder::new(graph(), &rules).build(&changes);

        let order: Vec<_> = spec.units_to_compile().iter().cloned().collect();
        assert_eq!(order, vec![id("C"), id("B"), id("A")]);
    }

    #[test]
    fn test_added_unit_is_compiled() {
        let rules = RuleSet::default();
        let changes = ChangeSet::from_events([ChangeEvent::added("New")]);
        let spec = RecompilationSpecBuilder::new(graph(), &rules).build(&changes);

        assert!(!spec.is_full_rebuild_needed());
        assert_eq!(units(&spec), vec![id("New")]);
    }

    #[test]
    fn test_removed_unit_listed_for_deletion() {
        let rules = RuleSet::default();
        let changes = ChangeSet::from_events([ChangeEvent::removed("B")]);
        let spec = RecompilationSpecBuilder::new(graph(), &rules).build(&changes);

        assert_eq!(units(&spec), vec![id("A"), id("B")]);
        assert_eq!(
            spec.units_to_delete().iter().cloned().collect::<Vec<_>>(),
            vec![id("B")]
        );
    }

    #[test]
    fn test_conflict_escalates_before_rules() {
        let rules = RuleSet::new();
        let changes = ChangeSet::from_events([ChangeEvent::modified("C"), ChangeEvent::added("C")]);
        let spec = RecompilationSpecBuilder::new(graph(), &rules).build(&changes);

        let cause = spec.full_rebuild_cause().unwrap();
        assert_eq!(cause.rule, "conflicting-change");
        assert_eq!(cause.unit, Some(id("C")));
    }

    #[test]
    fn test_missing_graph() {
        let rules = RuleSet::default();
        let builder = RecompilationSpecBuilder::without_graph(&rules);

        let spec = builder.build(&ChangeSet::from_events([ChangeEvent::added("X")]));
        let cause = spec.full_rebuild_cause().unwrap();
        assert_eq!(cause.rule, "missing-graph");
        assert_eq!(cause.unit, Some(id("X")));
        assert!(spec.initial_graph().is_none());

        assert!(builder.build(&ChangeSet::new()).is_up_to_date());
    }

    #[test]
    fn test_first_full_rebuild_cause_wins() {
        let rules = RuleSet::default();
        let changes = ChangeSet::from_events([
            ChangeEvent::modified("C"),
            ChangeEvent::modified("Unknown1"),
            ChangeEvent::modified("Unknown2"),
        ]);
        let spec = RecompilationSpecBuilder::new(graph(), &rules).build(&changes);
        assert_eq!(
            spec.full_rebuild_cause().and_then(|c| c.unit.clone()),
            Some(id("Unknown1"))
        );
    }

    #[test]
    fn test_pool_gives_same_set() {
        let rules = RuleSet::default();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let changes = ChangeSet::from_events([ChangeEvent::modified("C"), ChangeEvent::modified("Z")]);

        let sequential = RecompilationSpecBuilder::new(graph(), &rules).build(&changes);
        let parallel = RecompilationSpecBuilder::new(graph(), &rules)
            .with_pool(&pool)
            .build(&changes);
        assert_eq!(units(&sequential), units(&parallel));
    }
}
