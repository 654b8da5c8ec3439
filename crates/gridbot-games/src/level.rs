//! Maze level data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::grid::{Facing, Pos};

/// Errors raised while loading a level.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid level '{id}': {reason}")]
    Invalid { id: String, reason: String },
}

/// A rectangular maze with walls, a start cell and a goal cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub width: i32,
    pub height: i32,
    pub start: Pos,
    #[serde(default)]
    pub facing: Facing,
    pub goal: Pos,
    #[serde(default)]
    pub walls: BTreeSet<Pos>,
}

impl Level {
    /// An empty `width` × `height` maze.
    pub fn open(id: impl Into<String>, width: i32, height: i32, start: Pos, goal: Pos) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            start,
            facing: Facing::North,
            goal,
            walls: BTreeSet::new(),
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Pos>) -> Self {
        self.walls.extend(walls);
        self
    }

    /// Parse and check a level.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.check()?;
        Ok(level)
    }

    /// Check that the level is playable: positive size, start and goal on
    /// open cells.
    pub fn check(&self) -> Result<(), LevelError> {
        let invalid = |reason: String| LevelError::Invalid {
            id: self.id.clone(),
            reason,
        };
        if self.width <= 0 || self.height <= 0 {
            return Err(invalid(format!(
                "size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.is_open(self.start) {
            return Err(invalid(format!("start {} is not an open cell", self.start)));
        }
        if !self.is_open(self.goal) {
            return Err(invalid(format!("goal {} is not an open cell", self.goal)));
        }
        Ok(())
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.contains(&pos)
    }

    /// In bounds and not a wall.
    pub fn is_open(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }
}
