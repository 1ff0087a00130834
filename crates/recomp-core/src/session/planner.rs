//! One planning pass per build invocation.

use std::sync::Arc;

use super::context::{AbortHandle, PlanningCallback};
use crate::change::{ChangeClassifier, ChangeSet, FileChange, SourceMapping};
use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::plan::{RecompilationSpec, RecompilationSpecBuilder};
use crate::rules::RuleSet;

/// Lifecycle of a planning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Planning,
    PartialPlanReady,
    FullRebuildPlanReady,
}

/// Orchestrates planning passes: takes the prior graph and the build's
/// changes, runs the builder and hands the plan back.
///
/// The session keeps no data between passes; the graph, changes and rules
/// are all supplied by the caller.
pub struct PlanningSession {
    config: PlannerConfig,
    rules: RuleSet,
    /// Bounded closure worker pool (only with parallel closure enabled)
    pool: Option<rayon::ThreadPool>,
    state: SessionState,
    callback: Option<Arc<dyn PlanningCallback>>,
    abort: Option<AbortHandle>,
}

impl PlanningSession {
    /// Create a session, validating `config` eagerly.
    pub fn new(config: PlannerConfig, rules: RuleSet) -> Result<Self> {
        config.validate()?;

        let pool = if config.parallel_closure {
            let mut builder = rayon::ThreadPoolBuilder::new()
                .thread_name(|index| format!("recomp-closure-{}", index));
            if let Some(workers) = config.max_workers {
                builder = builder.num_threads(workers);
            }
            Some(builder.build().map_err(|e| Error::ThreadPool(e.to_string()))?)
        } else {
            None
        };

        tracing::debug!("planning session created with rules {:?}", rules);

        Ok(Self {
            config,
            rules,
            pool,
            state: SessionState::Idle,
            callback: None,
            abort: None,
        })
    }

    /// Create a sequential session with the canonical rules.
    pub fn with_defaults() -> Self {
        Self {
            config: PlannerConfig::default(),
            rules: RuleSet::default(),
            pool: None,
            state: SessionState::Idle,
            callback: None,
            abort: None,
        }
    }

    pub fn set_callback(&mut self, callback: impl PlanningCallback + 'static) {
        self.callback = Some(Arc::new(callback));
    }

    pub fn set_abort_handle(&mut self, handle: AbortHandle) {
        self.abort = Some(handle);
    }

    pub fn abort_handle(&self) -> Option<&AbortHandle> {
        self.abort.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Plan one build.
    ///
    /// `graph` is `None` when the prior analysis could not be loaded; any
    /// non-empty change set then plans a full rebuild.
    pub fn plan(
        &mut self,
        graph: Option<Arc<DependencyGraph>>,
        changes: &ChangeSet,
    ) -> Result<RecompilationSpec> {
        // a previous plan still marked ready has been handed off
        self.state = SessionState::Planning;

        match self.run(graph, changes) {
            Ok(spec) => {
                self.state = if spec.is_full_rebuild_needed() {
                    SessionState::FullRebuildPlanReady
                } else {
                    SessionState::PartialPlanReady
                };
                Ok(spec)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    /// Classify raw file changes against `mapping`, then plan.
    ///
    /// A change naming an unmapped source fails the pass.
    pub fn plan_files<I>(
        &mut self,
        graph: Option<Arc<DependencyGraph>>,
        mapping: &SourceMapping,
        changes: I,
    ) -> Result<RecompilationSpec>
    where
        I: IntoIterator<Item = FileChange>,
    {
        let mut classifier = ChangeClassifier::new(mapping);
        if let Some(graph) = graph.as_deref() {
            classifier = classifier.with_prior_graph(graph);
        }
        let change_set = classifier.classify(changes)?;
        self.plan(graph, &change_set)
    }

    /// Mark the current plan as handed off.
    pub fn finish(&mut self) {
        self.state = SessionState::Idle;
    }

    fn run(
        &self,
        graph: Option<Arc<DependencyGraph>>,
        changes: &ChangeSet,
    ) -> Result<RecompilationSpec> {
        self.check_aborted()?;

        if let Some(callback) = &self.callback {
            callback.on_planning_started(changes.len());
        }

        let spec = match graph {
            Some(graph) => {
                if self.config.detect_cycles {
                    let cycles = graph.cycles();
                    if !cycles.is_empty() {
                        tracing::debug!(
                            "prior graph has {} dependency cycles, largest spans {} units",
                            cycles.len(),
                            cycles.iter().map(Vec::len).max().unwrap_or(0)
                        );
                    }
                }

                let parallel = self.config.use_parallel_for(graph.len());
                let mut builder = RecompilationSpecBuilder::new(graph, &self.rules);
                if let Some(pool) = self.pool.as_ref().filter(|_| parallel) {
                    builder = builder.with_pool(pool);
                }
                builder.build(changes)
            }
            None => {
                tracing::warn!("no usable dependency graph for this build");
                RecompilationSpecBuilder::without_graph(&self.rules).build(changes)
            }
        };

        self.check_aborted()?;

        if let Some(callback) = &self.callback {
            if let Some(cause) = spec.full_rebuild_cause() {
                callback.on_rule_fired(cause);
            }
            callback.on_plan_ready(&spec);
        }

        Ok(spec)
    }

    fn check_aborted(&self) -> Result<()> {
        match &self.abort {
            Some(handle) if handle.is_aborted() => {
                tracing::info!("planning pass abandoned by host");
                Err(Error::Aborted)
            }
            _ => Ok(()),
        }
    }
}
