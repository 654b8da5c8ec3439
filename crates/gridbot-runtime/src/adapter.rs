//! The contract between the interpreter and a game.

use async_trait::async_trait;
use gridbot_types::Op;
use std::fmt;

/// Designed end of a run decided by the game, as opposed to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The agent reached the goal.
    Win,
    /// The agent ran into a wall or off the board.
    Collision,
}

impl Outcome {
    /// Short sentinel the host matches on.
    pub fn sentinel(self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Collision => "CHOQUE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentinel())
    }
}

/// What applying one op did to the run.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Keep walking.
    Continue,
    /// End the run here. The state already reflects the outcome.
    Outcome(Outcome),
}

/// Game-specific binding from ops to state transitions.
///
/// The interpreter never looks inside `S`. `apply_op` mutates the state in
/// place, so whatever it changed before returning an outcome or an error is
/// kept.
#[async_trait]
pub trait Adapter<S>: Send + Sync
where
    S: Send,
{
    /// Apply one non-repeat op. Waits are applied too, before the
    /// interpreter sleeps; most games treat them as a no-op.
    async fn apply_op(&self, op: &Op, state: &mut S) -> anyhow::Result<Applied>;

    /// Put `state` back at its starting point. Called once at the start of
    /// every run; hosts also call it directly from their Stop button.
    fn reset(&self, state: S) -> S;
}
