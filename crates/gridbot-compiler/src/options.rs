//! Block vocabulary: which editor block types map to which op.
//!
//! Each game ships its own block types; the compiler only knows semantic
//! roles. A role lists one or more type tags, and can be written in JSON as
//! either a single string or an array:
//!
//! ```json
//! { "start": "maze_start", "repeat": ["maze_repeat", "controls_repeat_ext"] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Semantic role of a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Start,
    Move,
    Back,
    TurnLeft,
    TurnRight,
    Repeat,
    Wait,
}

/// A set of block type tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany", into = "Vec<String>")]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for TagSet {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(tag) => TagSet::new([tag]),
            OneOrMany::Many(tags) => TagSet::new(tags),
        }
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Names of the fields and inputs the compiler reads from blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Cell count on move/back blocks.
    pub steps: String,
    /// Iteration count on repeat blocks (field or value input).
    pub times: String,
    /// Duration on wait blocks, in milliseconds.
    pub ms: String,
    /// Statement input holding a repeat body.
    pub body: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            steps: "STEPS".into(),
            times: "TIMES".into(),
            ms: "MS".into(),
            body: "DO".into(),
        }
    }
}

/// Role → block types mapping handed to [`crate::compile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    pub start: TagSet,
    #[serde(rename = "move")]
    pub forward: TagSet,
    pub back: TagSet,
    pub turn_left: TagSet,
    pub turn_right: TagSet,
    pub repeat: TagSet,
    pub wait: TagSet,
    pub fields: FieldNames,
}

impl CompileOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Vocabulary of the maze game.
    pub fn maze() -> Self {
        Self {
            start: TagSet::new(["maze_start"]),
            forward: TagSet::new(["maze_move_forward"]),
            back: TagSet::new(["maze_move_backward"]),
            turn_left: TagSet::new(["maze_turn_left"]),
            turn_right: TagSet::new(["maze_turn_right"]),
            repeat: TagSet::new(["maze_repeat", "controls_repeat", "controls_repeat_ext"]),
            wait: TagSet::new(["maze_wait"]),
            fields: FieldNames::default(),
        }
    }

    /// Vocabulary of the free practice board.
    pub fn practice() -> Self {
        Self {
            start: TagSet::new(["practice_start"]),
            forward: TagSet::new(["practice_forward"]),
            back: TagSet::new(["practice_back"]),
            turn_left: TagSet::new(["practice_left"]),
            turn_right: TagSet::new(["practice_right"]),
            repeat: TagSet::new(["practice_repeat", "controls_repeat", "controls_repeat_ext"]),
            wait: TagSet::new(["practice_wait"]),
            fields: FieldNames::default(),
        }
    }

    /// Role of a block type. When a tag is listed under several roles the
    /// first in declaration order wins.
    pub fn role_of(&self, tag: &str) -> Option<Role> {
        [
            (&self.start, Role::Start),
            (&self.forward, Role::Move),
            (&self.back, Role::Back),
            (&self.turn_left, Role::TurnLeft),
            (&self.turn_right, Role::TurnRight),
            (&self.repeat, Role::Repeat),
            (&self.wait, Role::Wait),
        ]
        .into_iter()
        .find_map(|(set, role)| set.contains(tag).then_some(role))
    }
}
