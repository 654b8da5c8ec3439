//! Caller-supplied notifications.

use crate::error::RunError;

/// Status text shown while a program runs.
pub const STATUS_RUNNING: &str = "Ejecutando...";
/// Status text after a program ran to the end.
pub const STATUS_DONE: &str = "Finalizado.";
/// Status text after a run was stopped.
pub const STATUS_STOPPED: &str = "Detenido.";

/// Best-effort notifications from a run. Every method defaults to a no-op.
///
/// Hooks are called from the task that drives the run, in execution order.
pub trait Hooks: Send + Sync {
    /// An op is about to execute. Fired once per executed occurrence, so a
    /// block inside a repeat is reported on every iteration.
    fn on_step(&self, _block_id: &str) {}

    fn on_status(&self, _text: &str) {}

    /// The whole program ran without being stopped or interrupted.
    fn on_done(&self) {}

    /// The run ended on an outcome or an adapter failure.
    fn on_error(&self, _error: &RunError) {}
}

impl Hooks for () {}
