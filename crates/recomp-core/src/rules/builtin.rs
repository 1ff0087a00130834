//! The canonical forcing conditions shared by every compiler backend.

use rustc_hash::FxHashSet;

use super::{InvalidationRule, InvalidationVerdict};
use crate::change::{ChangeEvent, ChangeKind};
use crate::graph::{CompiledUnitId, DependencyGraph};

type UnitPredicate = Box<dyn Fn(&CompiledUnitId) -> bool + Send + Sync>;

fn unit_list(units: impl IntoIterator<Item = impl Into<CompiledUnitId>>) -> UnitPredicate {
    let units: FxHashSet<CompiledUnitId> = units.into_iter().map(Into::into).collect();
    Box::new(move |unit: &CompiledUnitId| units.contains(unit))
}

/// A modified unit with no dependency record means the graph is stale.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownToGraphRule;

impl InvalidationRule for UnknownToGraphRule {
    fn name(&self) -> &str {
        "unknown-to-graph"
    }

    fn evaluate(&self, change: &ChangeEvent, graph: &DependencyGraph) -> InvalidationVerdict {
        if change.kind == ChangeKind::Modified && !graph.contains(&change.unit) {
            return InvalidationVerdict::full_rebuild(
                self.name(),
                change,
                format!("no dependency record for modified unit {}", change.unit),
            );
        }
        InvalidationVerdict::Incremental
    }
}

/// Units exposing inlinable compile-time constants.
///
/// Dependents copy the constant's value rather than referencing the unit, so
/// the graph cannot see them.
pub struct ConstantBearingRule {
    detector: UnitPredicate,
}

impl ConstantBearingRule {
    /// Use `detector` (backed by the backend's static analysis) to flag units.
    pub fn new(detector: impl Fn(&CompiledUnitId) -> bool + Send + Sync + 'static) -> Self {
        Self {
            detector: Box::new(detector),
        }
    }

    /// Flag exactly the listed units.
    pub fn from_units(units: impl IntoIterator<Item = impl Into<CompiledUnitId>>) -> Self {
        Self {
            detector: unit_list(units),
        }
    }

    /// A rule that never fires, for backends without constant inlining.
    pub fn none() -> Self {
        Self::new(|_| false)
    }
}

impl InvalidationRule for ConstantBearingRule {
    fn name(&self) -> &str {
        "constant-bearing"
    }

    fn evaluate(&self, change: &ChangeEvent, _graph: &DependencyGraph) -> InvalidationVerdict {
        if (self.detector)(&change.unit) {
            return InvalidationVerdict::full_rebuild(
                self.name(),
                change,
                format!(
                    "{} unit {} exposes inlinable compile-time constants",
                    change.kind, change.unit
                ),
            );
        }
        InvalidationVerdict::Incremental
    }
}

/// Units produced or consumed by a code generation step whose outputs are not
/// individually tracked.
pub struct GeneratedSourceRule {
    detector: UnitPredicate,
}

impl GeneratedSourceRule {
    pub fn new(detector: impl Fn(&CompiledUnitId) -> bool + Send + Sync + 'static) -> Self {
        Self {
            detector: Box::new(detector),
        }
    }

    pub fn from_units(units: impl IntoIterator<Item = impl Into<CompiledUnitId>>) -> Self {
        Self {
            detector: unit_list(units),
        }
    }

    pub fn none() -> Self {
        Self::new(|_| false)
    }
}

impl InvalidationRule for GeneratedSourceRule {
    fn name(&self) -> &str {
        "generated-source"
    }

    fn evaluate(&self, change: &ChangeEvent, _graph: &DependencyGraph) -> InvalidationVerdict {
        if (self.detector)(&change.unit) {
            return InvalidationVerdict::full_rebuild(
                self.name(),
                change,
                format!(
                    "{} unit {} takes part in untracked code generation",
                    change.kind, change.unit
                ),
            );
        }
        InvalidationVerdict::Incremental
    }
}

/// A removed unit the graph never saw: its dependents cannot be enumerated.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemovedUnknownRule;

impl InvalidationRule for RemovedUnknownRule {
    fn name(&self) -> &str {
        "removed-unknown"
    }

    fn evaluate(&self, change: &ChangeEvent, graph: &DependencyGraph) -> InvalidationVerdict {
        if change.kind == ChangeKind::Removed && !graph.contains(&change.unit) {
            return InvalidationVerdict::full_rebuild(
                self.name(),
                change,
                format!(
                    "removed unit {} had no recorded dependents; cannot confirm safety",
                    change.unit
                ),
            );
        }
        InvalidationVerdict::Incremental
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(units: &[&str]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for unit in units {
            graph.add_unit(CompiledUnitId::new(unit));
        }
        graph
    }

    #[test]
    fn test_unknown_to_graph_only_for_modified() {
        let graph = graph_with(&["Known"]);
        let rule = UnknownToGraphRule;

        assert!(rule.evaluate(&ChangeEvent::modified("D"), &graph).is_full_rebuild());
        assert!(!rule.evaluate(&ChangeEvent::modified("Known"), &graph).is_full_rebuild());
        assert!(!rule.evaluate(&ChangeEvent::added("D"), &graph).is_full_rebuild());
        assert!(!rule.evaluate(&ChangeEvent::removed("D"), &graph).is_full_rebuild());
    }

    #[test]
    fn test_unknown_to_graph_cause_names_unit() {
        let graph = DependencyGraph::new();
        let verdict = UnknownToGraphRule.evaluate(&ChangeEvent::modified("D"), &graph);
        let cause = verdict.cause().unwrap();

        assert_eq!(cause.rule, "unknown-to-graph");
        assert_eq!(cause.unit, Some(CompiledUnitId::new("D")));
        assert_eq!(cause.description, "no dependency record for modified unit D");
    }

    #[test]
    fn test_constant_bearing_from_units() {
        let graph = graph_with(&["E", "F"]);
        let rule = ConstantBearingRule::from_units(["E"]);

        assert!(rule.evaluate(&ChangeEvent::modified("E"), &graph).is_full_rebuild());
        assert!(rule.evaluate(&ChangeEvent::added("E"), &graph).is_full_rebuild());
        assert!(!rule.evaluate(&ChangeEvent::modified("F"), &graph).is_full_rebuild());
        assert!(!ConstantBearingRule::none()
            .evaluate(&ChangeEvent::modified("E"), &graph)
            .is_full_rebuild());
    }

    #[test]
    fn test_generated_source_predicate() {
        let graph = graph_with(&["gen.Parser", "app.Main"]);
        let rule = GeneratedSourceRule::new(|unit| unit.as_str().starts_with("gen."));

        let verdict = rule.evaluate(&ChangeEvent::modified("gen.Parser"), &graph);
        assert_eq!(verdict.cause().map(|c| c.rule.as_str()), Some("generated-source"));
        assert!(!rule.evaluate(&ChangeEvent::modified("app.Main"), &graph).is_full_rebuild());
    }

    #[test]
    fn test_removed_unknown() {
        let graph = graph_with(&["F"]);
        let rule = RemovedUnknownRule;

        assert!(rule.evaluate(&ChangeEvent::removed("Ghost"), &graph).is_full_rebuild());
        assert!(!rule.evaluate(&ChangeEvent::removed("F"), &graph).is_full_rebuild());
    }

    #[test]
    fn test_cause_keeps_source() {
        let graph = DependencyGraph::new();
        let change = ChangeEvent::removed("Ghost").with_source("src/Ghost.java");
        let verdict = RemovedUnknownRule.evaluate(&change, &graph);
        assert_eq!(
            verdict.cause().and_then(|c| c.source.clone()),
            Some("src/Ghost.java".into())
        );
    }
}
