//! Plain data form of a dependency graph, as handed over by the post-compile analyzer.

use indexmap::IndexMap;

use super::types::{CompiledUnitId, DependencyGraph};

/// Analysis record: every analyzed unit mapped to the units it depends on.
///
/// Units that only appear on the right-hand side are registered as known with
/// zero recorded dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub units: IndexMap<CompiledUnitId, Vec<CompiledUnitId>>,
}

impl GraphSnapshot {
    /// Record `unit` with its direct dependencies.
    pub fn insert(
        &mut self,
        unit: impl Into<CompiledUnitId>,
        dependencies: impl IntoIterator<Item = impl Into<CompiledUnitId>>,
    ) -> &mut Self {
        self.units.insert(
            unit.into(),
            dependencies.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl From<GraphSnapshot> for DependencyGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut graph = DependencyGraph::new();
        for (unit, dependencies) in snapshot.units {
            graph.add_unit(unit.clone());
            for dependency in dependencies {
                graph.add_dependency(unit.clone(), dependency);
            }
        }
        graph
    }
}

impl From<&DependencyGraph> for GraphSnapshot {
    fn from(graph: &DependencyGraph) -> Self {
        let units = graph
            .units()
            .map(|unit| (unit.clone(), graph.dependencies_of(unit)))
            .collect();
        Self { units }
    }
}
