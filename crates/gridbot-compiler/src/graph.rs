//! Read-only model of the block editor's workspace.
//!
//! Mirrors the editor's JSON serialization:
//!
//! ```json
//! { "blocks": { "languageVersion": 0, "blocks": [
//!     { "type": "maze_start", "id": "a", "x": 20, "y": 20,
//!       "next": { "block": { "type": "maze_move_forward", "id": "b",
//!                            "fields": { "STEPS": 2 } } } }
//! ] } }
//! ```
//!
//! Top-level entries are the heads of stacks; everything else hangs off a
//! `next` link or a named input.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while reading a serialized workspace.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed workspace: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A full editor workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockGraph {
    #[serde(default)]
    pub blocks: TopBlocks,
}

/// The list of top-level stacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBlocks {
    #[serde(default)]
    pub language_version: u32,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// One block node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Type tag, e.g. `"maze_move_forward"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Connection>,
}

/// A link to a child block (a `next` link or a named input).
///
/// Value inputs may carry only a shadow block, which the editor shows as an
/// inline default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Box<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Box<Block>>,
}

impl Connection {
    /// The attached block, falling back to the shadow.
    fn target(&self) -> Option<&Block> {
        self.block.as_deref().or(self.shadow.as_deref())
    }
}

impl BlockGraph {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn new(stacks: Vec<Block>) -> Self {
        Self {
            blocks: TopBlocks {
                language_version: 0,
                blocks: stacks,
            },
        }
    }

    /// Heads of the top-level stacks in editor order: top to bottom, then
    /// left to right. Blocks without a position keep their serialized order.
    pub fn top_blocks(&self) -> Vec<&Block> {
        let mut tops: Vec<&Block> = self.blocks.blocks.iter().collect();
        tops.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        tops
    }
}

impl Block {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set a field value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach a block to a named input.
    pub fn with_input(mut self, name: impl Into<String>, child: Block) -> Self {
        self.inputs.insert(
            name.into(),
            Connection {
                block: Some(Box::new(child)),
                shadow: None,
            },
        );
        self
    }

    /// Link the block that follows this one.
    pub fn with_next(mut self, next: Block) -> Self {
        self.next = Some(Connection {
            block: Some(Box::new(next)),
            shadow: None,
        });
        self
    }

    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_ref().and_then(|c| c.block.as_deref())
    }

    /// First block of a statement input (e.g. a repeat body).
    pub fn statement(&self, name: &str) -> Option<&Block> {
        self.inputs.get(name).and_then(|c| c.block.as_deref())
    }

    /// Read a numeric value.
    ///
    /// Looks at the field `name` first (a number or a numeric string), then at
    /// a value block plugged into the input of the same name, whose first
    /// numeric field is used. `None` when nothing readable is found.
    pub fn number_field(&self, name: &str) -> Option<f64> {
        if let Some(n) = self.fields.get(name).and_then(as_number) {
            return Some(n);
        }
        let value_block = self.inputs.get(name)?.target()?;
        value_block.fields.values().find_map(as_number)
    }

    /// This block followed by every block reachable through `next` links.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            current: Some(self),
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Iterator over a stack of blocks linked by `next`.
pub struct Chain<'a> {
    current: Option<&'a Block>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.current?;
        self.current = block.next_block();
        Some(block)
    }
}
