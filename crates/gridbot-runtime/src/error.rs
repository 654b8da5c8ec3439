//! Error types for the Gridbot runtime.

use crate::adapter::Outcome;
use thiserror::Error;

/// Why a run ended early, as reported to [`crate::Hooks::on_error`].
#[derive(Debug, Error)]
pub enum RunError {
    /// The game ended the run on purpose. Hosts inspect their state to show
    /// the win or collision screen instead of this text.
    #[error("{0}")]
    Outcome(Outcome),

    /// The adapter failed.
    #[error(transparent)]
    Adapter(#[from] anyhow::Error),
}

impl RunError {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Outcome(o) => Some(*o),
            Self::Adapter(_) => None,
        }
    }
}

/// Errors from the run handle itself.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The task driving the run panicked or was aborted.
    #[error("run task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
