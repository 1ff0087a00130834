//! Dependency graph of compiled units.
//!
//! This module provides:
//! - The read-only graph snapshot queried during a planning pass
//! - Reverse-dependency closure (sequential and level-parallel)
//! - Conversion from the analyzer's plain snapshot form
//! - Cycle diagnostics

pub(crate) mod closure;
mod snapshot;
mod types;

pub use closure::UnitSet;
pub use snapshot::GraphSnapshot;
pub use types::{CompiledUnitId, DependencyGraph};
