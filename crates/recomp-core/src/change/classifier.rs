//! Translate file-level notifications into a unit-level [`ChangeSet`].

use super::set::ChangeSet;
use super::types::{ChangeEvent, FileChange, SourceMapping};
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;

/// Classifies raw file changes against a source-to-unit mapping.
///
/// The prior graph, when available, tells which units existed in the last
/// successful build.
pub struct ChangeClassifier<'a> {
    mapping: &'a SourceMapping,
    prior: Option<&'a DependencyGraph>,
}

impl<'a> ChangeClassifier<'a> {
    pub fn new(mapping: &'a SourceMapping) -> Self {
        Self {
            mapping,
            prior: None,
        }
    }

    /// Use `graph` to decide whether a unit existed before this window.
    pub fn with_prior_graph(mut self, graph: &'a DependencyGraph) -> Self {
        self.prior = Some(graph);
        self
    }

    /// Classify `changes` in arrival order.
    ///
    /// Fails if a change names a source the mapping does not know, since that
    /// means the change detector and the mapping disagree.
    pub fn classify<I>(&self, changes: I) -> Result<ChangeSet>
    where
        I: IntoIterator<Item = FileChange>,
    {
        let mut set = ChangeSet::new();
        let mut files = 0usize;

        for change in changes {
            files += 1;
            let units = self
                .mapping
                .units_for(&change.path)
                .ok_or_else(|| Error::UnmappedSource {
                    path: change.path.clone(),
                })?;
            if units.is_empty() {
                return Err(Error::EmptyMapping { path: change.path });
            }

            for unit in units {
                let known_before = self.prior.is_some_and(|graph| graph.contains(unit));
                set.record(
                    ChangeEvent::new(unit.clone(), change.kind).with_source(&change.path),
                    known_before,
                );
            }
        }

        tracing::debug!(
            "classified {} file changes into {} unit changes ({} conflicts)",
            files,
            set.len(),
            set.conflicts().count()
        );
        Ok(set)
    }
}
