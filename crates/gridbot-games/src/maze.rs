//! The maze game: walk the agent to the goal without hitting a wall.

use async_trait::async_trait;
use gridbot_runtime::{Adapter, Applied, Outcome};
use gridbot_types::Op;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::grid::{Facing, Pos};
use crate::level::Level;
use crate::render::RenderContext;
use crate::Status;

pub const WIN_MESSAGE: &str = "¡Llegaste a la meta!";
pub const WALL_MESSAGE: &str = "¡Chocaste con una pared!";
pub const EDGE_MESSAGE: &str = "¡Te saliste del tablero!";

/// State of one maze game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeState {
    pub level_id: String,
    pub position: Pos,
    pub facing: Facing,
    pub status: Status,
    #[serde(default)]
    pub message: String,
}

impl MazeState {
    /// The agent on the level's start cell, idle.
    pub fn initial(level: &Level) -> Self {
        Self {
            level_id: level.id.clone(),
            position: level.start,
            facing: level.facing,
            status: Status::Idle,
            message: String::new(),
        }
    }
}

pub fn serialize_state(state: &MazeState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

pub fn deserialize_state(json: &str) -> serde_json::Result<MazeState> {
    serde_json::from_str(json)
}

/// Runtime adapter for one maze level.
#[derive(Debug, Clone)]
pub struct MazeAdapter {
    level: Level,
    render: Option<RenderContext<MazeState>>,
    step_delay: Duration,
}

impl MazeAdapter {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            render: None,
            step_delay: Duration::ZERO,
        }
    }

    /// Draw every state change on `render`.
    pub fn with_render(mut self, render: RenderContext<MazeState>) -> Self {
        self.render = Some(render);
        self
    }

    /// Pause this long before each cell of a move, so the host can
    /// animate the walk.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    fn draw(&self, state: &MazeState) {
        if let Some(render) = &self.render {
            render.render(state);
        }
    }

    async fn walk(&self, steps: i32, state: &mut MazeState) -> Applied {
        let backwards = steps < 0;
        for _ in 0..steps.unsigned_abs() {
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }

            let next = state.position.step(state.facing, backwards);
            if !self.level.is_open(next) {
                state.status = Status::Error;
                state.message = if self.level.in_bounds(next) {
                    WALL_MESSAGE
                } else {
                    EDGE_MESSAGE
                }
                .to_string();
                tracing::debug!(level = %self.level.id, from = %state.position, to = %next, "collision");
                self.draw(state);
                return Applied::Outcome(Outcome::Collision);
            }

            state.position = next;
            if next == self.level.goal {
                state.status = Status::Win;
                state.message = WIN_MESSAGE.to_string();
                tracing::debug!(level = %self.level.id, "goal reached");
                self.draw(state);
                return Applied::Outcome(Outcome::Win);
            }
            self.draw(state);
        }
        Applied::Continue
    }
}

#[async_trait]
impl Adapter<MazeState> for MazeAdapter {
    async fn apply_op(&self, op: &Op, state: &mut MazeState) -> anyhow::Result<Applied> {
        let applied = match op {
            Op::Start { .. } => {
                state.status = Status::Running;
                state.message.clear();
                self.draw(state);
                Applied::Continue
            }
            Op::Move { steps, .. } => self.walk(*steps, state).await,
            Op::Turn { direction, .. } => {
                state.facing = state.facing.turned(*direction);
                self.draw(state);
                Applied::Continue
            }
            Op::Wait { .. } => Applied::Continue,
            Op::Repeat { block_id, .. } => {
                anyhow::bail!("repeat block {block_id} must be unrolled by the interpreter")
            }
        };
        Ok(applied)
    }

    fn reset(&self, state: MazeState) -> MazeState {
        if state.level_id != self.level.id {
            tracing::debug!(from = %state.level_id, to = %self.level.id, "resetting onto another level");
        }
        let fresh = MazeState::initial(&self.level);
        self.draw(&fresh);
        fresh
    }
}
