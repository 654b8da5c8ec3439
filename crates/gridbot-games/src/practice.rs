//! Free practice board: no walls and no goal, just a trail to look at.

use async_trait::async_trait;
use gridbot_runtime::{Adapter, Applied, Outcome};
use gridbot_types::Op;
use serde::{Deserialize, Serialize};

use crate::grid::{Facing, Pos};
use crate::maze::EDGE_MESSAGE;
use crate::render::RenderContext;
use crate::Status;

/// An open board of `width` × `height` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub start: Pos,
    #[serde(default)]
    pub facing: Facing,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            start: Pos::new(0, 0),
            facing: Facing::North,
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }
}

/// State of a practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeState {
    pub position: Pos,
    pub facing: Facing,
    /// Every cell visited, starting cell included, in order.
    pub trail: Vec<Pos>,
    /// Cells moved so far.
    pub moves: u32,
    pub status: Status,
    #[serde(default)]
    pub message: String,
}

impl PracticeState {
    pub fn initial(board: &Board) -> Self {
        Self {
            position: board.start,
            facing: board.facing,
            trail: vec![board.start],
            moves: 0,
            status: Status::Idle,
            message: String::new(),
        }
    }
}

pub fn serialize_state(state: &PracticeState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

pub fn deserialize_state(json: &str) -> serde_json::Result<PracticeState> {
    serde_json::from_str(json)
}

/// Runtime adapter for the practice board.
#[derive(Debug, Clone)]
pub struct PracticeAdapter {
    board: Board,
    render: Option<RenderContext<PracticeState>>,
}

impl PracticeAdapter {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            render: None,
        }
    }

    pub fn with_render(mut self, render: RenderContext<PracticeState>) -> Self {
        self.render = Some(render);
        self
    }

    fn draw(&self, state: &PracticeState) {
        if let Some(render) = &self.render {
            render.render(state);
        }
    }
}

#[async_trait]
impl Adapter<PracticeState> for PracticeAdapter {
    async fn apply_op(&self, op: &Op, state: &mut PracticeState) -> anyhow::Result<Applied> {
        match op {
            Op::Start { .. } => {
                state.status = Status::Running;
                state.message.clear();
            }
            Op::Move { steps, .. } => {
                for _ in 0..steps.unsigned_abs() {
                    let next = state.position.step(state.facing, *steps < 0);
                    if !self.board.in_bounds(next) {
                        state.status = Status::Error;
                        state.message = EDGE_MESSAGE.to_string();
                        self.draw(state);
                        return Ok(Applied::Outcome(Outcome::Collision));
                    }
                    state.position = next;
                    state.trail.push(next);
                    state.moves = state.moves.saturating_add(1);
                }
            }
            Op::Turn { direction, .. } => state.facing = state.facing.turned(*direction),
            Op::Wait { .. } => return Ok(Applied::Continue),
            Op::Repeat { block_id, .. } => {
                anyhow::bail!("repeat block {block_id} must be unrolled by the interpreter")
            }
        }
        self.draw(state);
        Ok(Applied::Continue)
    }

    fn reset(&self, _state: PracticeState) -> PracticeState {
        let fresh = PracticeState::initial(&self.board);
        self.draw(&fresh);
        fresh
    }
}
