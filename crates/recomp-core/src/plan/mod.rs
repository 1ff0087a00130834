//! Recompilation planning.
//!
//! # Algorithm
//!
//! ```text
//! ChangeSet ──► conflicts? ──► FullRebuild
//!     │
//!     └── per event: RuleSet::evaluate ──► first FullRebuild wins
//!             │
//!             └── seeds (added, modified, removed units)
//!                     │
//!                     └── reverse-dependency closure ──► units_to_compile
//! ```
//!
//! Removed units are seeded like any other change, so their dependents are
//! recompiled and the unit itself is listed both for compilation and for
//! output deletion.

mod builder;
mod spec;

pub use builder::RecompilationSpecBuilder;
pub use spec::{FullRebuildCause, RecompilationSpec};
