//! Grid geometry shared by the games.
//!
//! `y` grows towards the north and `x` towards the east.

use gridbot_types::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `facing`, or against it when
    /// `backwards` is set.
    pub fn step(self, facing: Facing, backwards: bool) -> Self {
        let (dx, dy) = facing.delta();
        let sign = if backwards { -1 } else { 1 };
        Self::new(self.x + dx * sign, self.y + dy * sign)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where the agent is looking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[default]
    North,
    East,
    South,
    West,
}

impl Facing {
    /// Unit offset of one step forward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, 1),
            Facing::East => (1, 0),
            Facing::South => (0, -1),
            Facing::West => (-1, 0),
        }
    }

    /// Facing after a quarter turn.
    pub fn turned(self, direction: Direction) -> Self {
        match (self, direction) {
            (Facing::North, Direction::Right) | (Facing::South, Direction::Left) => Facing::East,
            (Facing::East, Direction::Right) | (Facing::West, Direction::Left) => Facing::South,
            (Facing::South, Direction::Right) | (Facing::North, Direction::Left) => Facing::West,
            (Facing::West, Direction::Right) | (Facing::East, Direction::Left) => Facing::North,
        }
    }
}
