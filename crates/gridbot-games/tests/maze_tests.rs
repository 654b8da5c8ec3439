//! Maze game tests.
//!
//! Tests for:
//! - adapter semantics (moves, turns, collisions, goal)
//! - deterministic reset and state (de)serialization
//! - end-to-end runs through the runtime, from ops and from editor JSON
//! - rendering through an explicitly owned render context

use gridbot_compiler::{compile_json, validate, CompileOptions};
use gridbot_games::maze::{self, EDGE_MESSAGE, WALL_MESSAGE, WIN_MESSAGE};
use gridbot_games::{Canvas, Facing, Level, MazeAdapter, MazeState, Pos, RenderContext, Status};
use gridbot_runtime::{run, Adapter, Applied, Hooks, Outcome, RunEnd, RunError, RunOptions};
use gridbot_types::{Direction, Op, Program};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// 3×3 empty grid, agent at (0,0) facing north, goal at (1,1).
fn corner_level() -> Level {
    Level::open("corner", 3, 3, Pos::new(0, 0), Pos::new(1, 1))
}

/// 3×3 grid with a wall at (0,1), agent at (0,0) facing south. South is
/// -y, so the first step leaves the grid before the wall matters.
fn walled_level() -> Level {
    Level::open("walled", 3, 3, Pos::new(0, 0), Pos::new(2, 2))
        .with_facing(Facing::South)
        .with_walls([Pos::new(0, 1)])
}

#[derive(Default)]
struct Recorder {
    done: Mutex<usize>,
    errors: Mutex<Vec<String>>,
    outcomes: Mutex<Vec<Outcome>>,
}

impl Hooks for Recorder {
    fn on_done(&self) {
        *self.done.lock().unwrap() += 1;
    }

    fn on_error(&self, error: &RunError) {
        self.errors.lock().unwrap().push(error.to_string());
        if let Some(outcome) = error.outcome() {
            self.outcomes.lock().unwrap().push(outcome);
        }
    }
}

/// Records every frame drawn, per surface.
#[derive(Default)]
struct FrameLog {
    frames: Mutex<Vec<(String, Pos, Facing, Status)>>,
}

impl Canvas<MazeState> for FrameLog {
    fn draw(&self, surface_id: &str, state: &MazeState) {
        self.frames.lock().unwrap().push((
            surface_id.to_string(),
            state.position,
            state.facing,
            state.status,
        ));
    }
}

async fn apply(adapter: &MazeAdapter, op: Op, state: &mut MazeState) -> Applied {
    adapter
        .apply_op(&op, state)
        .await
        .expect("maze adapter should not fail")
}

fn started(level: &Level) -> MazeState {
    let mut state = MazeState::initial(level);
    state.status = Status::Running;
    state
}

// ══════════════════════════════════════════════════════════════════════════════
// Adapter semantics
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn start_marks_running() {
    let level = corner_level();
    let adapter = MazeAdapter::new(level.clone());
    let mut state = MazeState::initial(&level);
    state.message = "old".into();

    assert_eq!(apply(&adapter, Op::start("s"), &mut state).await, Applied::Continue);
    assert_eq!(state.status, Status::Running);
    assert!(state.message.is_empty());
}

#[tokio::test]
async fn move_and_turn() {
    let level = Level::open("big", 5, 5, Pos::new(0, 0), Pos::new(4, 4));
    let adapter = MazeAdapter::new(level.clone());
    let mut state = started(&level);

    apply(&adapter, Op::move_by(2, "m"), &mut state).await;
    assert_eq!(state.position, Pos::new(0, 2));

    apply(&adapter, Op::turn(Direction::Right, "t"), &mut state).await;
    assert_eq!(state.facing, Facing::East);

    apply(&adapter, Op::move_by(3, "m"), &mut state).await;
    assert_eq!(state.position, Pos::new(3, 2));

    apply(&adapter, Op::move_by(-2, "b"), &mut state).await;
    assert_eq!(state.position, Pos::new(1, 2));
    assert_eq!(state.status, Status::Running);
}

#[tokio::test]
async fn wall_collision_keeps_agent_on_last_open_cell() {
    let level = Level::open("w", 3, 3, Pos::new(0, 0), Pos::new(2, 2)).with_walls([Pos::new(0, 2)]);
    let adapter = MazeAdapter::new(level.clone());
    let mut state = started(&level);

    let applied = apply(&adapter, Op::move_by(5, "m"), &mut state).await;
    assert_eq!(applied, Applied::Outcome(Outcome::Collision));
    assert_eq!(state.position, Pos::new(0, 1));
    assert_eq!(state.status, Status::Error);
    assert_eq!(state.message, WALL_MESSAGE);
}

#[tokio::test]
async fn leaving_the_grid_is_a_collision() {
    let level = corner_level();
    let adapter = MazeAdapter::new(level.clone());
    let mut state = started(&level);

    let applied = apply(&adapter, Op::move_by(-1, "b"), &mut state).await;
    assert_eq!(applied, Applied::Outcome(Outcome::Collision));
    assert_eq!(state.position, Pos::new(0, 0));
    assert_eq!(state.message, EDGE_MESSAGE);
}

#[tokio::test]
async fn goal_mid_move_wins_immediately() {
    let level = Level::open("line", 1, 5, Pos::new(0, 0), Pos::new(0, 2));
    let adapter = MazeAdapter::new(level.clone());
    let mut state = started(&level);

    let applied = apply(&adapter, Op::move_by(4, "m"), &mut state).await;
    assert_eq!(applied, Applied::Outcome(Outcome::Win));
    assert_eq!(state.position, Pos::new(0, 2));
    assert_eq!(state.status, Status::Win);
    assert_eq!(state.message, WIN_MESSAGE);
}

#[tokio::test]
async fn wait_and_zero_move_change_nothing() {
    let level = corner_level();
    let adapter = MazeAdapter::new(level.clone());
    let mut state = started(&level);
    let before = state.clone();

    apply(&adapter, Op::wait(500.0, "w"), &mut state).await;
    apply(&adapter, Op::move_by(0, "m"), &mut state).await;
    assert_eq!(state, before);
}

#[tokio::test]
async fn repeat_is_rejected_by_the_adapter() {
    let level = corner_level();
    let adapter = MazeAdapter::new(level.clone());
    let mut state = started(&level);
    let err = adapter
        .apply_op(&Op::repeat(2.0, vec![], "r"), &mut state)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("repeat block r"));
}

#[tokio::test(start_paused = true)]
async fn step_delay_animates_each_cell() {
    let level = Level::open("tall", 1, 10, Pos::new(0, 0), Pos::new(0, 9));
    let adapter = MazeAdapter::new(level.clone()).with_step_delay(Duration::from_millis(100));
    let mut state = started(&level);

    let t0 = Instant::now();
    apply(&adapter, Op::move_by(3, "m"), &mut state).await;
    assert!(t0.elapsed() >= Duration::from_millis(300));
    assert_eq!(state.position, Pos::new(0, 3));
}

// ══════════════════════════════════════════════════════════════════════════════
// Reset & persistence
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn reset_is_deterministic() {
    let level = corner_level();
    let adapter = MazeAdapter::new(level.clone());
    let mut moved = MazeState::initial(&level);
    moved.position = Pos::new(2, 1);
    moved.status = Status::Error;

    let once = adapter.reset(moved.clone());
    let twice = adapter.reset(moved);
    assert_eq!(once, twice);
    assert_eq!(once, MazeState::initial(&level));
    assert_eq!(adapter.reset(once.clone()), once);
}

#[test]
fn state_round_trips_through_json() {
    let level = walled_level();
    let mut state = MazeState::initial(&level);
    state.status = Status::Win;
    state.message = WIN_MESSAGE.into();

    let json = maze::serialize_state(&state).unwrap();
    assert!(json.contains("\"status\":\"win\""));
    assert!(json.contains("\"levelId\":\"walled\""));
    assert!(json.contains("\"facing\":\"south\""));
    assert_eq!(maze::deserialize_state(&json).unwrap(), state);
}

#[test]
fn saved_state_without_message_loads() {
    let state = maze::deserialize_state(
        r#"{ "levelId": "x", "position": { "x": 1, "y": 2 }, "facing": "west", "status": "idle" }"#,
    )
    .unwrap();
    assert_eq!(state.position, Pos::new(1, 2));
    assert!(state.message.is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// End to end
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn walk_to_goal_ends_with_win() {
    let level = corner_level();
    let frames = Arc::new(FrameLog::default());
    let adapter = Arc::new(
        MazeAdapter::new(level.clone())
            .with_render(RenderContext::new("maze-main", frames.clone())),
    );
    let hooks = Arc::new(Recorder::default());
    let program = Program::new(vec![
        Op::start("s"),
        Op::move_by(1, "m1"),
        Op::turn(Direction::Right, "t"),
        Op::move_by(1, "m2"),
    ]);
    validate(&program).unwrap();

    let controller = run(
        program,
        adapter,
        hooks.clone(),
        RunOptions::new(MazeState::initial(&level)),
    );
    let report = controller.join().await.unwrap();

    assert_eq!(report.end, RunEnd::Outcome(Outcome::Win));
    assert_eq!(report.state.position, Pos::new(1, 1));
    assert_eq!(report.state.facing, Facing::East);
    assert_eq!(report.state.status, Status::Win);
    assert_eq!(*hooks.errors.lock().unwrap(), vec!["WIN".to_string()]);
    assert_eq!(*hooks.done.lock().unwrap(), 0);

    let frames = frames.frames.lock().unwrap();
    let path: Vec<(Pos, Facing)> = frames.iter().map(|f| (f.1, f.2)).collect();
    assert_eq!(
        path,
        vec![
            (Pos::new(0, 0), Facing::North), // reset
            (Pos::new(0, 0), Facing::North), // start
            (Pos::new(0, 1), Facing::North),
            (Pos::new(0, 1), Facing::East),
            (Pos::new(1, 1), Facing::East),
        ]
    );
    assert!(frames.iter().all(|f| f.0 == "maze-main"));
    assert_eq!(frames.last().map(|f| f.3), Some(Status::Win));
}

#[tokio::test]
async fn collision_ends_run_without_done() {
    let level = walled_level();
    let adapter = Arc::new(MazeAdapter::new(level.clone()));
    let hooks = Arc::new(Recorder::default());
    let program = Program::new(vec![Op::start("s"), Op::move_by(5, "m")]);

    let controller = run(
        program,
        adapter,
        hooks.clone(),
        RunOptions::new(MazeState::initial(&level)),
    );
    let report = controller.join().await.unwrap();

    assert_eq!(report.end, RunEnd::Outcome(Outcome::Collision));
    assert_eq!(report.state.status, Status::Error);
    assert_eq!(report.state.position, Pos::new(0, 0));
    assert_eq!(*hooks.outcomes.lock().unwrap(), vec![Outcome::Collision]);
    assert_eq!(report.state.message, EDGE_MESSAGE);
    assert_eq!(*hooks.done.lock().unwrap(), 0);
}

#[tokio::test]
async fn walking_into_a_wall_ends_run_without_done() {
    let level = walled_level().with_facing(Facing::North);
    let adapter = Arc::new(MazeAdapter::new(level.clone()));
    let hooks = Arc::new(Recorder::default());
    let program = Program::new(vec![Op::start("s"), Op::move_by(5, "m")]);

    let report = run(
        program,
        adapter,
        hooks.clone(),
        RunOptions::new(MazeState::initial(&level)),
    )
    .join()
    .await
    .unwrap();

    assert_eq!(report.end, RunEnd::Outcome(Outcome::Collision));
    assert_eq!(report.state.status, Status::Error);
    assert_eq!(report.state.position, Pos::new(0, 0));
    assert_eq!(report.state.message, WALL_MESSAGE);
    assert_eq!(*hooks.errors.lock().unwrap(), vec!["CHOQUE".to_string()]);
    assert_eq!(*hooks.done.lock().unwrap(), 0);
}

#[tokio::test]
async fn program_that_misses_the_goal_finishes_running() {
    let level = corner_level();
    let adapter = Arc::new(MazeAdapter::new(level.clone()));
    let hooks = Arc::new(Recorder::default());
    let program = Program::new(vec![Op::start("s"), Op::turn(Direction::Left, "t")]);

    let report = run(
        program,
        adapter,
        hooks.clone(),
        RunOptions::new(MazeState::initial(&level)),
    )
    .join()
    .await
    .unwrap();

    assert_eq!(report.end, RunEnd::Done);
    assert_eq!(report.state.status, Status::Running);
    assert_eq!(*hooks.done.lock().unwrap(), 1);
}

#[tokio::test]
async fn two_surfaces_render_independently() {
    let level = corner_level();
    let left = Arc::new(FrameLog::default());
    let right = Arc::new(FrameLog::default());
    let adapter_left =
        Arc::new(MazeAdapter::new(level.clone()).with_render(RenderContext::new("left", left.clone())));
    let adapter_right = Arc::new(
        MazeAdapter::new(level.clone()).with_render(RenderContext::new("right", right.clone())),
    );

    let short = Program::new(vec![Op::start("s")]);
    let long = Program::new(vec![Op::start("s"), Op::turn(Direction::Left, "t")]);
    let a = run(short, adapter_left, Arc::new(()), RunOptions::new(MazeState::initial(&level)));
    let b = run(long, adapter_right, Arc::new(()), RunOptions::new(MazeState::initial(&level)));
    a.join().await.unwrap();
    b.join().await.unwrap();

    assert_eq!(left.frames.lock().unwrap().len(), 2);
    assert_eq!(right.frames.lock().unwrap().len(), 3);
    assert!(right.frames.lock().unwrap().iter().all(|f| f.0 == "right"));
}

const WORKSPACE: &str = r#"
{ "blocks": { "blocks": [
  { "type": "maze_start", "id": "start",
    "next": { "block": {
      "type": "maze_repeat", "id": "loop", "fields": { "TIMES": 2 },
      "inputs": { "DO": { "block": {
        "type": "maze_move_forward", "id": "fwd", "fields": { "STEPS": 2 },
        "next": { "block": { "type": "maze_turn_right", "id": "right" } }
      } } }
    } } }
] } }
"#;

#[tokio::test]
async fn editor_workspace_to_win() {
    // 3×3, start (0,0) north, goal (2,2): up two, turn, right two.
    let level = Level::open("square", 3, 3, Pos::new(0, 0), Pos::new(2, 2));
    let result = compile_json(WORKSPACE, &CompileOptions::maze());
    assert!(result.success, "compile errors: {:?}", result.errors);
    let program = result.program.unwrap();

    let report = run(
        program,
        Arc::new(MazeAdapter::new(level.clone())),
        Arc::new(()),
        RunOptions::new(MazeState::initial(&level)),
    )
    .join()
    .await
    .unwrap();

    assert_eq!(report.end, RunEnd::Outcome(Outcome::Win));
    assert_eq!(report.state.position, Pos::new(2, 2));
}
