//! Planning sessions.
//!
//! # State machine
//!
//! ```text
//! Idle ──plan()──► Planning ──┬──► PartialPlanReady ─────┐
//!                             └──► FullRebuildPlanReady ─┴──finish()/plan()──► Idle
//! ```
//!
//! A failed or aborted pass goes straight back to `Idle`; there is no
//! resumable planning state.

mod context;
mod planner;

pub use context::{AbortHandle, PlanningCallback};
pub use planner::{PlanningSession, SessionState};
