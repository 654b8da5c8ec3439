//! Gridbot games: adapters that give ops a meaning on a grid.
//!
//! - [`maze`] — reach the goal without touching a wall.
//! - [`practice`] — an open board that records the agent's trail.
//!
//! Each game owns its state type and its (de)serialization, so hosts can
//! persist a game next to the editor workspace.

pub mod grid;
pub mod level;
pub mod maze;
pub mod practice;
pub mod render;

pub use grid::{Facing, Pos};
pub use level::{Level, LevelError};
pub use maze::{MazeAdapter, MazeState};
pub use practice::{Board, PracticeAdapter, PracticeState};
pub use render::{Canvas, RenderContext};

use serde::{Deserialize, Serialize};

/// Where a game stands, as shown to the learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Running,
    Win,
    Error,
}
