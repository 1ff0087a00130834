//! Deduplicated, unit-keyed change set.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::types::{ChangeConflict, ChangeEvent, ChangeKind};
use crate::graph::CompiledUnitId;

/// Changes for one build, keyed by unit, in first-reported order.
///
/// A unit is either in `events` or in `conflicts`, never both. Once a unit
/// conflicts it stays conflicted for the rest of the window.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    events: IndexMap<CompiledUnitId, ChangeEvent, FxBuildHasher>,
    conflicts: IndexMap<CompiledUnitId, ChangeConflict, FxBuildHasher>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a change set from unit-level events with no prior graph knowledge.
    ///
    /// Without a graph an add followed by a removal cannot be attributed to a
    /// stale state and is reported as a conflict.
    pub fn from_events(events: impl IntoIterator<Item = ChangeEvent>) -> Self {
        let mut set = Self::new();
        for event in events {
            set.record(event, false);
        }
        set
    }

    /// Fold one event into the set.
    ///
    /// `known_before` tells whether the unit existed in the last successful
    /// build; it decides how an add followed by a removal collapses.
    pub fn record(&mut self, event: ChangeEvent, known_before: bool) {
        if self.conflicts.contains_key(&event.unit) {
            return;
        }

        let Some(previous) = self.events.get_mut(&event.unit) else {
            self.events.insert(event.unit.clone(), event);
            return;
        };

        match collapse(previous.kind, event.kind, known_before) {
            Some(kind) => {
                previous.kind = kind;
                if previous.source.is_none() {
                    previous.source = event.source;
                }
            }
            None => {
                let earlier = previous.kind;
                let source = event.source.or_else(|| previous.source.clone());
                self.events.shift_remove(&event.unit);
                tracing::debug!(
                    "conflicting changes for {}: {} then {}",
                    event.unit,
                    earlier,
                    event.kind
                );
                self.conflicts.insert(
                    event.unit.clone(),
                    ChangeConflict {
                        unit: event.unit,
                        earlier,
                        later: event.kind,
                        source,
                    },
                );
            }
        }
    }

    /// Classified events, in first-reported order.
    pub fn events(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.events.values()
    }

    /// Units of one change kind, in first-reported order.
    pub fn units_of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &CompiledUnitId> {
        self.events
            .values()
            .filter(move |event| event.kind == kind)
            .map(|event| &event.unit)
    }

    pub fn get(&self, unit: &CompiledUnitId) -> Option<&ChangeEvent> {
        self.events.get(unit)
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &ChangeConflict> {
        self.conflicts.values()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Number of classified (non-conflicting) events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when there are neither events nor conflicts.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.conflicts.is_empty()
    }
}

impl FromIterator<ChangeEvent> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = ChangeEvent>>(iter: T) -> Self {
        Self::from_events(iter)
    }
}

/// Combine two kinds reported for the same unit, or `None` on conflict.
fn collapse(earlier: ChangeKind, later: ChangeKind, known_before: bool) -> Option<ChangeKind> {
    use ChangeKind::*;

    match (earlier, later) {
        (a, b) if a == b => Some(a),
        (Added, Modified) => Some(Added),
        (Modified, Removed) => Some(Removed),
        // deleted and recreated within the window
        (Removed, Added) => Some(Modified),
        (Added, Removed) if known_before => Some(Removed),
        _ => None,
    }
}
