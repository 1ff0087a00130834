//! Change set classification.
//!
//! File-level notifications from the change detector are mapped to compiled
//! units and folded into one deduplicated [`ChangeSet`] per build. Changes
//! that cannot be reconciled are kept as [`ChangeConflict`]s for the planner
//! to escalate.

mod classifier;
mod set;
mod types;

pub use classifier::ChangeClassifier;
pub use set::ChangeSet;
pub use types::{ChangeConflict, ChangeEvent, ChangeKind, FileChange, SourceMapping};
