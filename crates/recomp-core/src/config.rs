//! Planner configuration.

use crate::error::{Error, Result};

/// Configuration for a planning session, validated once before planning.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Expand the closure on a worker pool
    pub parallel_closure: bool,

    /// Minimum number of graph units before the parallel closure is used
    pub parallel_threshold: usize,

    /// Worker pool size; `None` lets rayon pick one per core
    pub max_workers: Option<usize>,

    /// Log dependency cycles found in the prior graph
    pub detect_cycles: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            parallel_closure: false,
            parallel_threshold: 10_000,
            max_workers: None,
            detect_cycles: true,
        }
    }
}

impl PlannerConfig {
    /// Closure always runs on the calling thread.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Closure runs on a pool of `workers` threads for large graphs.
    pub fn parallel(workers: usize) -> Self {
        Self {
            parallel_closure: true,
            max_workers: Some(workers),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == Some(0) {
            return Err(Error::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if !self.parallel_closure && self.max_workers.is_some() {
            tracing::debug!("max_workers is set but parallel closure is disabled; ignoring");
        }
        Ok(())
    }

    /// Whether a graph of `graph_len` units should use the parallel closure.
    pub fn use_parallel_for(&self, graph_len: usize) -> bool {
        self.parallel_closure && graph_len >= self.parallel_threshold
    }
}
