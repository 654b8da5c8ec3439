//! Block graph → op tree.
//!
//! Pure function of the graph and the vocabulary. Blocks whose type has no
//! role (comments, math helpers, blocks from another game) are skipped.

use gridbot_types::{Direction, Op, Program};

use crate::graph::{Block, BlockGraph};
use crate::options::{CompileOptions, Role};

/// Cells moved when a move/back block has no readable count.
pub const DEFAULT_STEPS: i32 = 1;
/// Iterations when a repeat block has no readable count.
pub const DEFAULT_TIMES: f64 = 0.0;
/// Milliseconds waited when a wait block has no readable duration.
pub const DEFAULT_WAIT_MS: f64 = 0.0;

/// Compile the program stack of an editor workspace.
///
/// The program is the first stack (in editor order) headed by a start
/// block. Every other stack is ignored. Without one, the first stack is
/// compiled with its top-level start blocks dropped, so the result never
/// opens with `Start` and fails validation; an empty workspace yields an
/// empty program.
pub fn compile(graph: &BlockGraph, options: &CompileOptions) -> Program {
    let tops = graph.top_blocks();
    let is_start = |block: &Block| options.role_of(&block.kind) == Some(Role::Start);

    if let Some(head) = tops.iter().copied().find(|block| is_start(*block)) {
        tracing::trace!(head = %head.id, stacks = tops.len(), "compiling program stack");
        return Program::new(compile_stack(head, options));
    }

    match tops.first() {
        Some(first) => {
            tracing::debug!(head = %first.id, "no stack is headed by a start block");
            let ops = compile_stack(first, options)
                .into_iter()
                .filter(|op| !matches!(op, Op::Start { .. }))
                .collect();
            Program::new(ops)
        }
        None => Program::default(),
    }
}

/// Compile a stack of blocks linked by `next`, starting at `first`.
pub fn compile_stack(first: &Block, options: &CompileOptions) -> Vec<Op> {
    first
        .chain()
        .filter_map(|block| compile_block(block, options))
        .collect()
}

fn compile_block(block: &Block, options: &CompileOptions) -> Option<Op> {
    let Some(role) = options.role_of(&block.kind) else {
        tracing::debug!(block = %block.id, kind = %block.kind, "skipping unrecognized block");
        return None;
    };
    let fields = &options.fields;
    let block_id = block.id.clone();

    let op = match role {
        Role::Start => Op::Start { block_id },
        Role::Move => Op::Move {
            steps: read_steps(block, &fields.steps),
            block_id,
        },
        Role::Back => Op::Move {
            steps: read_steps(block, &fields.steps).saturating_neg(),
            block_id,
        },
        Role::TurnLeft => Op::Turn {
            direction: Direction::Left,
            block_id,
        },
        Role::TurnRight => Op::Turn {
            direction: Direction::Right,
            block_id,
        },
        Role::Repeat => Op::Repeat {
            times: block.number_field(&fields.times).unwrap_or(DEFAULT_TIMES),
            body: block
                .statement(&fields.body)
                .map(|first| compile_stack(first, options))
                .unwrap_or_default(),
            block_id,
        },
        Role::Wait => Op::Wait {
            ms: block.number_field(&fields.ms).unwrap_or(DEFAULT_WAIT_MS),
            block_id,
        },
    };
    Some(op)
}

fn read_steps(block: &Block, field: &str) -> i32 {
    block
        .number_field(field)
        .map(|n| n.trunc() as i32)
        .unwrap_or(DEFAULT_STEPS)
}
