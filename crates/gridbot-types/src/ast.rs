//! Compiled op tree for Gridbot programs.
//!
//! A [`Program`] exclusively owns its ops and every [`Op::Repeat`] owns its
//! body, so the tree can never contain cycles or shared nodes. Every op keeps
//! the id of the editor block it came from so the host can highlight the
//! block that is currently executing.

use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Program
// ══════════════════════════════════════════════════════════════════════════════

/// An ordered sequence of top-level ops.
///
/// A runnable program is non-empty and starts with [`Op::Start`]; that is
/// checked by the validator, not by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    pub fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Total number of op nodes, counting every nested repeat body.
    ///
    /// Repeat counts do not multiply this figure: `Repeat { times: 50 }`
    /// with a two-op body counts as three ops.
    pub fn op_count(&self) -> usize {
        count_ops(&self.ops)
    }

    /// Whether the first top-level op is [`Op::Start`].
    pub fn starts_with_start(&self) -> bool {
        matches!(self.ops.first(), Some(Op::Start { .. }))
    }
}

fn count_ops(ops: &[Op]) -> usize {
    ops.iter().map(Op::op_count).sum()
}

// ══════════════════════════════════════════════════════════════════════════════
// Ops
// ══════════════════════════════════════════════════════════════════════════════

/// One compiled instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Op {
    /// Program entry point.
    Start {
        #[serde(rename = "blockId")]
        block_id: String,
    },
    /// Move `steps` cells along the current facing; negative moves backward.
    Move {
        steps: i32,
        #[serde(rename = "blockId")]
        block_id: String,
    },
    /// Rotate a quarter turn.
    Turn {
        direction: Direction,
        #[serde(rename = "blockId")]
        block_id: String,
    },
    /// Run `body` `times` times. The count is floored and clamped to zero
    /// at execution, so fractional and negative input is tolerated here.
    Repeat {
        times: f64,
        body: Vec<Op>,
        #[serde(rename = "blockId")]
        block_id: String,
    },
    /// Pause for `ms` milliseconds (negative values behave as zero).
    Wait {
        ms: f64,
        #[serde(rename = "blockId")]
        block_id: String,
    },
}

impl Op {
    /// Id of the editor block this op was compiled from.
    pub fn block_id(&self) -> &str {
        match self {
            Op::Start { block_id }
            | Op::Move { block_id, .. }
            | Op::Turn { block_id, .. }
            | Op::Repeat { block_id, .. }
            | Op::Wait { block_id, .. } => block_id,
        }
    }

    /// Short lowercase name of the op kind (`"move"`, `"repeat"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Op::Start { .. } => "start",
            Op::Move { .. } => "move",
            Op::Turn { .. } => "turn",
            Op::Repeat { .. } => "repeat",
            Op::Wait { .. } => "wait",
        }
    }

    /// Number of op nodes in this subtree, this op included.
    pub fn op_count(&self) -> usize {
        match self {
            Op::Repeat { body, .. } => 1 + count_ops(body),
            _ => 1,
        }
    }

    pub fn start(block_id: impl Into<String>) -> Self {
        Op::Start {
            block_id: block_id.into(),
        }
    }

    pub fn move_by(steps: i32, block_id: impl Into<String>) -> Self {
        Op::Move {
            steps,
            block_id: block_id.into(),
        }
    }

    pub fn turn(direction: Direction, block_id: impl Into<String>) -> Self {
        Op::Turn {
            direction,
            block_id: block_id.into(),
        }
    }

    pub fn repeat(times: f64, body: Vec<Op>, block_id: impl Into<String>) -> Self {
        Op::Repeat {
            times,
            body,
            block_id: block_id.into(),
        }
    }

    pub fn wait(ms: f64, block_id: impl Into<String>) -> Self {
        Op::Wait {
            ms,
            block_id: block_id.into(),
        }
    }
}

/// Quarter-turn direction for [`Op::Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_count_flat() {
        let program = Program::new(vec![
            Op::start("s"),
            Op::move_by(1, "m"),
            Op::turn(Direction::Left, "t"),
        ]);
        assert_eq!(program.op_count(), 3);
    }

    #[test]
    fn test_op_count_nested_repeats() {
        // start + repeat(move, repeat(turn, wait)) = 1 + 1 + 1 + 1 + 1 + 1
        let program = Program::new(vec![
            Op::start("s"),
            Op::repeat(
                10.0,
                vec![
                    Op::move_by(1, "m"),
                    Op::repeat(
                        3.0,
                        vec![Op::turn(Direction::Right, "t"), Op::wait(100.0, "w")],
                        "r2",
                    ),
                ],
                "r1",
            ),
        ]);
        assert_eq!(program.op_count(), 6);
    }

    #[test]
    fn test_empty_repeat_counts_itself() {
        assert_eq!(Op::repeat(4.0, vec![], "r").op_count(), 1);
    }

    #[test]
    fn test_starts_with_start() {
        assert!(Program::new(vec![Op::start("s")]).starts_with_start());
        assert!(!Program::new(vec![Op::move_by(1, "m")]).starts_with_start());
        assert!(!Program::default().starts_with_start());
    }

    #[test]
    fn test_block_id_and_kind() {
        let op = Op::wait(250.0, "blk-7");
        assert_eq!(op.block_id(), "blk-7");
        assert_eq!(op.kind(), "wait");
    }

    #[test]
    fn test_op_json_shape() {
        let op = Op::turn(Direction::Right, "b1");
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "turn", "direction": "right", "blockId": "b1" })
        );
    }

    #[test]
    fn test_program_from_json() {
        let program: Program = serde_json::from_str(
            r#"{ "ops": [
                { "type": "start", "blockId": "a" },
                { "type": "repeat", "times": 2.5, "blockId": "b", "body": [
                    { "type": "move", "steps": -1, "blockId": "c" }
                ] }
            ] }"#,
        )
        .unwrap();
        assert!(program.starts_with_start());
        assert_eq!(program.op_count(), 3);
        match &program.ops[1] {
            Op::Repeat { times, body, .. } => {
                assert_eq!(*times, 2.5);
                assert_eq!(body[0], Op::move_by(-1, "c"));
            }
            other => panic!("expected repeat, got {other:?}"),
        }
    }
}
