//! Cancellation and progress reporting for planning sessions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::plan::{FullRebuildCause, RecompilationSpec};

/// Handle for abandoning a planning pass at the session boundary.
///
/// The closure itself is not interruptible; the flag is checked before and
/// after the builder runs, and an aborted pass discards its result.
///
/// # Example
///
/// ```
/// use recomp_core::session::AbortHandle;
///
/// let handle = AbortHandle::new();
/// let handle_clone = handle.clone();
///
/// assert!(!handle.is_aborted());
/// handle_clone.abort();
/// assert!(handle.is_aborted());
/// ```
#[derive(Clone, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Request that the in-flight or next pass be abandoned.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    /// Clear the flag before reusing the handle for another build.
    pub fn reset(&self) {
        self.aborted.store(false, Ordering::Relaxed);
    }
}

/// Callback trait for planning progress reporting.
pub trait PlanningCallback: Send + Sync {
    /// Called when a pass starts with the number of classified unit changes.
    fn on_planning_started(&self, _change_count: usize) {}

    /// Called when a rule or condition forces a full rebuild.
    fn on_rule_fired(&self, _cause: &FullRebuildCause) {}

    /// Called with the finished plan, before it is returned to the caller.
    fn on_plan_ready(&self, _spec: &RecompilationSpec) {}
}
