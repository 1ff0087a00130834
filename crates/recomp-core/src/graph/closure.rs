//! Transitive closure over the reverse-dependency relation.
//!
//! Both variants are iterative and cycle-safe: membership in the result set is
//! what stops re-expansion, not any acyclicity assumption.

use std::collections::VecDeque;

use indexmap::IndexSet;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;

use super::types::{CompiledUnitId, DependencyGraph};

/// Insertion-ordered set of units.
pub type UnitSet = IndexSet<CompiledUnitId, FxBuildHasher>;

/// Worklist closure on the calling thread.
///
/// Seeds appear first in the result, in the order given; dependents follow in
/// breadth-first discovery order.
pub(crate) fn close_sequential<I>(graph: &DependencyGraph, seeds: I) -> UnitSet
where
    I: IntoIterator<Item = CompiledUnitId>,
{
    let mut result = UnitSet::default();
    let mut frontier: VecDeque<CompiledUnitId> = seeds.into_iter().collect();

    while let Some(unit) = frontier.pop_front() {
        if result.contains(&unit) {
            continue;
        }
        let dependents = graph.dependents_of(&unit);
        result.insert(unit);
        frontier.extend(
            dependents
                .into_iter()
                .filter(|dependent| !result.contains(dependent)),
        );
    }

    result
}

/// Level-synchronous closure with `dependents_of` lookups fanned out on `pool`.
///
/// Each level is expanded in parallel and merged into the result on the
/// calling thread, so a unit is only ever enqueued by the merge step and the
/// closure is complete once a level discovers nothing new.
pub(crate) fn close_parallel<I>(graph: &DependencyGraph, seeds: I, pool: &rayon::ThreadPool) -> UnitSet
where
    I: IntoIterator<Item = CompiledUnitId>,
{
    let mut result = UnitSet::default();
    let mut level: Vec<CompiledUnitId> = seeds
        .into_iter()
        .filter(|unit| result.insert(unit.clone()))
        .collect();
    let mut depth = 0usize;

    while !level.is_empty() {
        let discovered: Vec<Vec<CompiledUnitId>> = pool.install(|| {
            level
                .par_iter()
                .map(|unit| graph.dependents_of(unit))
                .collect()
        });

        let mut next = Vec::new();
        for unit in discovered.into_iter().flatten() {
            if result.insert(unit.clone()) {
                next.push(unit);
            }
        }

        tracing::trace!(
            "closure level {}: expanded {} units, discovered {}",
            depth,
            level.len(),
            next.len()
        );
        depth += 1;
        level = next;
    }

    result
}
