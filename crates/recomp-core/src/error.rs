//! Error types for recomp-core.
//!
//! Only contract violations and host-side failures are errors. Stale graphs,
//! conflicting changes and forcing rules are planning outcomes and surface as
//! [`FullRebuildCause`](crate::plan::FullRebuildCause) instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for recomp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recomp-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw change names a source the source-to-unit mapping does not know.
    #[error("no compiled units mapped for changed source '{}'", path.display())]
    UnmappedSource { path: PathBuf },

    /// A mapping entry exists but resolves to zero units.
    #[error("source '{}' is mapped to an empty unit list", path.display())]
    EmptyMapping { path: PathBuf },

    /// Planner configuration failed validation.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    /// The bounded closure worker pool could not be created.
    #[error("failed to build closure worker pool: {0}")]
    ThreadPool(String),

    /// The planning pass was abandoned by the host.
    #[error("planning aborted")]
    Aborted,
}

impl Error {
    /// A short recovery hint for users of the host build tool.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::UnmappedSource { .. } | Error::EmptyMapping { .. } => Some(
                "the source mapping is out of date with the change detector; run a clean build",
            ),
            Error::InvalidConfig(_) => Some("check the planner configuration file"),
            Error::ThreadPool(_) => Some("retry with parallel closure disabled"),
            Error::Aborted => None,
        }
    }

    /// Format the error together with its hint, if any.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{}\n  hint: {}", self, hint),
            None => self.to_string(),
        }
    }
}
