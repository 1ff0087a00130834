//! Incremental recompilation planner.
//!
//! This crate provides:
//! - Dependency graph of compiled units with reverse queries
//! - Change set classification (file changes to unit changes)
//! - Pluggable invalidation rules that can force a full rebuild
//! - Closure computation producing a recompilation spec
//! - Planning sessions orchestrating one pass per build
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use recomp_core::{ChangeEvent, ChangeSet, DependencyGraph, PlanningSession};
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_dependency("app.Main".into(), "lib.Util".into());
//!
//! let changes = ChangeSet::from_events([ChangeEvent::modified("lib.Util")]);
//! let mut session = PlanningSession::with_defaults();
//! let spec = session.plan(Some(Arc::new(graph)), &changes).unwrap();
//!
//! assert!(!spec.is_full_rebuild_needed());
//! assert_eq!(spec.units_to_compile().len(), 2);
//! ```

pub mod change;
pub mod config;
pub mod error;
pub mod graph;
pub mod plan;
pub mod rules;
pub mod session;

pub use change::{ChangeClassifier, ChangeEvent, ChangeKind, ChangeSet, FileChange, SourceMapping};
pub use config::PlannerConfig;
pub use error::{Error, Result};
pub use graph::{CompiledUnitId, DependencyGraph, GraphSnapshot, UnitSet};
pub use plan::{FullRebuildCause, RecompilationSpec, RecompilationSpecBuilder};
pub use rules::{
    ConstantBearingRule, GeneratedSourceRule, InvalidationRule, InvalidationVerdict, RuleSet,
};
pub use session::{AbortHandle, PlanningCallback, PlanningSession, SessionState};
