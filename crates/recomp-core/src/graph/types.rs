//! Types for the dependency graph.

use std::sync::Arc;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

/// Stable identifier for one compiled output unit (e.g. a fully-qualified type name).
///
/// Cloning is cheap: the name is shared behind an `Arc`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct CompiledUnitId(Arc<str>);

impl CompiledUnitId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompiledUnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompiledUnitId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CompiledUnitId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Record of which compiled units depend on which others, as observed by the
/// previous build's analysis.
///
/// Edges go from dependency to dependent, so the reverse query
/// ([`dependents_of`](Self::dependents_of)) is a plain outgoing-neighbor walk.
/// Only direct edges are stored; transitive reach is obtained by repeated
/// application.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The directed graph: edges go from dependency to dependent
    graph: DiGraph<CompiledUnitId, ()>,
    /// Unit ID to node index mapping
    node_indices: FxHashMap<CompiledUnitId, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit as analyzed, even if it has no edges.
    ///
    /// Returns `true` if the unit was not known before.
    pub fn add_unit(&mut self, unit: CompiledUnitId) -> bool {
        let known = self.node_indices.contains_key(&unit);
        self.ensure_node(unit);
        !known
    }

    /// Record that `dependent` depends on `dependency`.
    ///
    /// Both units become known. Repeated edges are stored once.
    pub fn add_dependency(&mut self, dependent: CompiledUnitId, dependency: CompiledUnitId) {
        let from = self.ensure_node(dependency);
        let to = self.ensure_node(dependent);
        self.graph.update_edge(from, to, ());
    }

    fn ensure_node(&mut self, unit: CompiledUnitId) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&unit) {
            return idx;
        }
        let idx = self.graph.add_node(unit.clone());
        self.node_indices.insert(unit, idx);
        idx
    }

    /// Whether the unit has a dependency record at all.
    ///
    /// Distinguishes "known, zero dependents" from "never analyzed".
    pub fn contains(&self, unit: &CompiledUnitId) -> bool {
        self.node_indices.contains_key(unit)
    }

    /// Units that directly depend on `unit`. Empty if the unit is unknown.
    pub fn dependents_of(&self, unit: &CompiledUnitId) -> Vec<CompiledUnitId> {
        self.neighbors(unit, Direction::Outgoing)
    }

    /// Units that `unit` directly depends on. Diagnostics only.
    pub fn dependencies_of(&self, unit: &CompiledUnitId) -> Vec<CompiledUnitId> {
        self.neighbors(unit, Direction::Incoming)
    }

    fn neighbors(&self, unit: &CompiledUnitId, direction: Direction) -> Vec<CompiledUnitId> {
        self.node_indices
            .get(unit)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, direction)
                    .map(|neighbor_idx| self.graph[neighbor_idx].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The unit plus everything that transitively depends on it.
    ///
    /// Returns an empty vector if the unit is unknown.
    pub fn transitive_dependents(&self, unit: &CompiledUnitId) -> Vec<CompiledUnitId> {
        if !self.contains(unit) {
            return Vec::new();
        }
        super::closure::close_sequential(self, std::iter::once(unit.clone()))
            .into_iter()
            .collect()
    }

    /// Strongly connected groups of units that form dependency cycles.
    ///
    /// Includes single units that depend on themselves. Each group is sorted
    /// and groups are ordered by their first member.
    pub fn cycles(&self) -> Vec<Vec<CompiledUnitId>> {
        use petgraph::algo::kosaraju_scc;

        let mut cycles: Vec<Vec<CompiledUnitId>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut units: Vec<_> = scc.iter().map(|&idx| self.graph[idx].clone()).collect();
                units.sort();
                units
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// All known units, in the order they were first recorded.
    pub fn units(&self) -> impl Iterator<Item = &CompiledUnitId> {
        self.graph.node_weights()
    }

    /// Number of known units.
    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    /// Check if the graph has no units.
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// Number of recorded dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
