//! Sequential interpreter for compiled programs.
//!
//! A run walks the op tree depth-first, one op at a time:
//!
//! * every op is announced through [`Hooks::on_step`] before it executes,
//! * repeats unroll `max(0, floor(times))` times,
//! * every other op goes through [`Adapter::apply_op`],
//! * waits sleep after being applied.
//!
//! The walk suspends only inside `apply_op` and inside waits. Stopping is
//! cooperative: [`Controller::stop`] cancels a token that is checked before
//! every op and every repeat iteration, and that wakes any pending wait
//! immediately. An `apply_op` call already in flight is allowed to finish.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gridbot_types::{Op, Program};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::adapter::{Adapter, Applied, Outcome};
use crate::error::{RunError, RuntimeError};
use crate::hooks::{Hooks, STATUS_DONE, STATUS_RUNNING, STATUS_STOPPED};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-run settings.
#[derive(Debug, Clone, Default)]
pub struct RunOptions<S> {
    /// Passed through [`Adapter::reset`] before the first op runs.
    pub initial_state: S,
}

impl<S> RunOptions<S> {
    pub fn new(initial_state: S) -> Self {
        Self { initial_state }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEnd {
    /// Every op executed.
    Done,
    /// [`Controller::stop`] was called.
    Stopped,
    /// The game ended the run.
    Outcome(Outcome),
    /// The adapter failed with this message.
    Failed(String),
}

/// Final state of a run, returned by [`Controller::join`].
#[derive(Debug)]
pub struct RunReport<S> {
    pub state: S,
    pub end: RunEnd,
}

/// Handle to a run in progress.
pub struct Controller<S> {
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
    handle: JoinHandle<RunReport<S>>,
}

impl<S> Controller<S> {
    /// Ask the run to stop. Pending waits resolve at once and no further op
    /// starts. Does nothing once the run has ended.
    pub fn stop(&self) {
        if self.is_running() && !self.cancel.is_cancelled() {
            tracing::debug!("stop requested");
            self.cancel.cancel();
        }
    }

    /// `false` once the run is done, stopped or interrupted.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Wait for the run to end and take its final state.
    pub async fn join(self) -> Result<RunReport<S>, RuntimeError> {
        Ok(self.handle.await?)
    }
}

/// Start executing `program`.
///
/// Resets the state through the adapter, reports [`STATUS_RUNNING`] and
/// returns right away; the ops run on a spawned task. Must be called from
/// within a Tokio runtime.
///
/// The program is assumed to have passed validation. Only one run per
/// game should be active: stop the previous controller before starting
/// another.
pub fn run<S, A, H>(
    program: Program,
    adapter: Arc<A>,
    hooks: Arc<H>,
    options: RunOptions<S>,
) -> Controller<S>
where
    S: Send + 'static,
    A: Adapter<S> + ?Sized + 'static,
    H: Hooks + ?Sized + 'static,
{
    let state = adapter.reset(options.initial_state);
    hooks.on_status(STATUS_RUNNING);

    let cancel = CancellationToken::new();
    let running = Arc::new(AtomicBool::new(true));
    let span = tracing::info_span!("run", ops = program.op_count());

    let walker = Walker {
        adapter,
        hooks,
        cancel: cancel.clone(),
        state,
    };
    let handle = tokio::spawn(walker.drive(program, running.clone()).instrument(span));

    Controller {
        cancel,
        running,
        handle,
    }
}

/// Clears the controller's running flag when dropped, including when the
/// run task panics.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Why the walk left early.
enum Halt {
    Stopped,
    Interrupted(RunError),
}

struct Walker<S, A: ?Sized, H: ?Sized> {
    adapter: Arc<A>,
    hooks: Arc<H>,
    cancel: CancellationToken,
    state: S,
}

impl<S, A, H> Walker<S, A, H>
where
    S: Send + 'static,
    A: Adapter<S> + ?Sized + 'static,
    H: Hooks + ?Sized + 'static,
{
    async fn drive(mut self, program: Program, running: Arc<AtomicBool>) -> RunReport<S> {
        let running = RunningGuard(running);
        let walked = match self.walk(&program.ops).await {
            // A stop that landed during the last op or the last wait still
            // counts as a stop.
            Ok(()) if self.cancel.is_cancelled() => Err(Halt::Stopped),
            other => other,
        };
        drop(running);

        let end = match walked {
            Ok(()) => {
                tracing::info!("run finished");
                self.hooks.on_done();
                self.hooks.on_status(STATUS_DONE);
                RunEnd::Done
            }
            Err(Halt::Stopped) => {
                tracing::info!("run stopped");
                self.hooks.on_status(STATUS_STOPPED);
                RunEnd::Stopped
            }
            Err(Halt::Interrupted(err)) => {
                let end = match &err {
                    RunError::Outcome(outcome) => {
                        tracing::info!(%outcome, "run ended with outcome");
                        RunEnd::Outcome(*outcome)
                    }
                    RunError::Adapter(e) => {
                        tracing::warn!(error = %e, "adapter failed");
                        RunEnd::Failed(e.to_string())
                    }
                };
                self.hooks.on_error(&err);
                end
            }
        };

        RunReport {
            state: self.state,
            end,
        }
    }

    fn walk<'a>(&'a mut self, ops: &'a [Op]) -> BoxFuture<'a, Result<(), Halt>> {
        Box::pin(async move {
            for op in ops {
                self.checkpoint()?;
                self.hooks.on_step(op.block_id());

                if let Op::Repeat { times, body, .. } = op {
                    for _ in 0..iterations(*times) {
                        // Keeps a long repeat of empty bodies from starving the
                        // task that wants to stop it.
                        tokio::task::yield_now().await;
                        self.checkpoint()?;
                        self.walk(body).await?;
                    }
                    continue;
                }

                self.apply(op).await?;
                if let Op::Wait { ms, .. } = op {
                    pause(&self.cancel, *ms).await;
                }
            }
            Ok(())
        })
    }

    fn checkpoint(&self) -> Result<(), Halt> {
        if self.cancel.is_cancelled() {
            Err(Halt::Stopped)
        } else {
            Ok(())
        }
    }

    async fn apply(&mut self, op: &Op) -> Result<(), Halt> {
        tracing::trace!(op = op.kind(), block = op.block_id(), "applying op");
        match self.adapter.apply_op(op, &mut self.state).await {
            Ok(Applied::Continue) => Ok(()),
            Ok(Applied::Outcome(outcome)) => Err(Halt::Interrupted(RunError::Outcome(outcome))),
            Err(e) => Err(Halt::Interrupted(RunError::Adapter(e))),
        }
    }
}

/// Sleep for a wait op. The timer is dropped as soon as `cancel` fires.
async fn pause(cancel: &CancellationToken, ms: f64) {
    let delay = wait_duration(ms);
    tracing::debug!(?delay, "waiting");
    tokio::select! {
        _ = tokio::time::sleep(delay) => {}
        _ = cancel.cancelled() => {
            tracing::debug!("wait cut short by stop");
        }
    }
}

/// Iterations of a repeat: `max(0, floor(times))`. NaN runs zero times.
pub fn iterations(times: f64) -> u64 {
    times.floor().max(0.0) as u64
}

/// Delay of a wait op; negative and NaN durations are zero.
pub fn wait_duration(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterations_floor_and_clamp() {
        assert_eq!(iterations(3.0), 3);
        assert_eq!(iterations(2.9), 2);
        assert_eq!(iterations(0.5), 0);
        assert_eq!(iterations(-4.0), 0);
        assert_eq!(iterations(f64::NAN), 0);
    }

    #[test]
    fn test_wait_duration_clamps() {
        assert_eq!(wait_duration(250.0), Duration::from_millis(250));
        assert_eq!(wait_duration(-10.0), Duration::ZERO);
        assert_eq!(wait_duration(f64::NAN), Duration::ZERO);
        assert_eq!(wait_duration(f64::INFINITY), Duration::MAX);
    }
}
