//! Invalidation rules: when a change cannot be handled incrementally.
//!
//! A [`RuleSet`] is an ordered list of [`InvalidationRule`]s evaluated per
//! changed unit before closure begins; the first rule demanding a full rebuild
//! wins. The exact catalogue of forcing conditions depends on the compiler
//! backend, so backends register their own rules next to the canonical ones.

mod builtin;

pub use builtin::{ConstantBearingRule, GeneratedSourceRule, RemovedUnknownRule, UnknownToGraphRule};

use crate::change::ChangeEvent;
use crate::graph::DependencyGraph;
use crate::plan::FullRebuildCause;

/// Outcome of evaluating one changed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationVerdict {
    /// Safe to handle via closure.
    Incremental,
    /// Incremental compilation is unsafe for this change.
    FullRebuild(FullRebuildCause),
}

impl InvalidationVerdict {
    /// Build a full-rebuild verdict attributed to `change`.
    pub fn full_rebuild(rule: &str, change: &ChangeEvent, description: impl Into<String>) -> Self {
        let mut cause = FullRebuildCause::new(rule, description).for_unit(change.unit.clone());
        if let Some(source) = &change.source {
            cause = cause.with_source(source.clone());
        }
        Self::FullRebuild(cause)
    }

    pub fn is_full_rebuild(&self) -> bool {
        matches!(self, Self::FullRebuild(_))
    }

    pub fn cause(&self) -> Option<&FullRebuildCause> {
        match self {
            Self::Incremental => None,
            Self::FullRebuild(cause) => Some(cause),
        }
    }
}

/// A predicate deciding whether one changed unit forces a full rebuild.
///
/// Rules must be pure with respect to the graph and the change.
pub trait InvalidationRule: Send + Sync {
    /// Stable rule name, reported in full-rebuild causes.
    fn name(&self) -> &str;

    /// Return [`InvalidationVerdict::Incremental`] to defer to later rules.
    fn evaluate(&self, change: &ChangeEvent, graph: &DependencyGraph) -> InvalidationVerdict;
}

/// Ordered, extensible list of invalidation rules.
///
/// `RuleSet::default()` holds the canonical rules with no backend detectors.
pub struct RuleSet {
    rules: Vec<Box<dyn InvalidationRule>>,
}

impl RuleSet {
    /// An empty rule set: every change is incremental.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The four canonical rules in their fixed order: unknown-to-graph,
    /// constant-bearing, generated-source, removed-unknown.
    pub fn canonical(constants: ConstantBearingRule, generated: GeneratedSourceRule) -> Self {
        Self::new()
            .with_rule(UnknownToGraphRule)
            .with_rule(constants)
            .with_rule(generated)
            .with_rule(RemovedUnknownRule)
    }

    /// Append a rule; it runs after every rule already registered.
    pub fn with_rule(mut self, rule: impl InvalidationRule + 'static) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: impl InvalidationRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Insert a rule at `index`, shifting later rules back.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn insert(&mut self, index: usize, rule: impl InvalidationRule + 'static) {
        self.rules.insert(index, Box::new(rule));
    }

    /// Evaluate every rule in order; the first full-rebuild verdict wins.
    pub fn evaluate(&self, change: &ChangeEvent, graph: &DependencyGraph) -> InvalidationVerdict {
        for rule in &self.rules {
            let verdict = rule.evaluate(change, graph);
            if verdict.is_full_rebuild() {
                tracing::debug!("rule '{}' fired for {} unit {}", rule.name(), change.kind, change.unit);
                return verdict;
            }
        }
        InvalidationVerdict::Incremental
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::canonical(ConstantBearingRule::none(), GeneratedSourceRule::none())
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
