//! Gridbot runtime: executes a validated program against a game.
//!
//! The runtime knows nothing about grids or goals. Each game plugs in an
//! [`Adapter`] that turns ops into state changes, and the host observes the
//! run through [`Hooks`] and the returned [`Controller`].
//!
//! ```rust,ignore
//! let controller = gridbot_runtime::run(
//!     program,
//!     Arc::new(MazeAdapter::new(level)),
//!     Arc::new(host_hooks),
//!     RunOptions::new(state),
//! );
//! // later, from the Stop button:
//! controller.stop();
//! ```

pub mod adapter;
pub mod error;
pub mod hooks;
pub mod interpreter;

pub use adapter::{Adapter, Applied, Outcome};
pub use error::{RunError, RuntimeError};
pub use hooks::{Hooks, STATUS_DONE, STATUS_RUNNING, STATUS_STOPPED};
pub use interpreter::{run, Controller, RunEnd, RunOptions, RunReport};
