//! Gridbot compiler: turns the block editor's workspace into a runnable program.
//!
//! ```text
//! Workspace JSON → BlockGraph → compile (CompileOptions) → Program → validate
//! ```

pub mod compile;
pub mod graph;
pub mod options;
pub mod validate;

pub use compile::{compile, compile_stack};
pub use graph::{Block, BlockGraph, Connection, GraphError};
pub use options::{CompileOptions, FieldNames, Role, TagSet};
pub use validate::validate;

use gridbot_types::{Diagnostic, ErrorCode, Program};
use serde::{Deserialize, Serialize};

/// Outcome of compiling and validating a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    /// Whether the program passed validation.
    pub success: bool,
    /// The compiled program, present whenever the workspace could be read,
    /// even if validation failed.
    pub program: Option<Program>,
    pub errors: Vec<Diagnostic>,
}

/// Compile `graph` and validate the result.
pub fn compile_to_result(graph: &BlockGraph, options: &CompileOptions) -> CompileResult {
    let program = compile(graph, options);
    let errors: Vec<Diagnostic> = validate(&program)
        .err()
        .map(|e| e.to_diagnostic())
        .into_iter()
        .collect();
    CompileResult {
        success: errors.is_empty(),
        program: Some(program),
        errors,
    }
}

/// Compile a serialized workspace. Unreadable JSON is reported as a
/// diagnostic rather than an error.
pub fn compile_json(workspace_json: &str, options: &CompileOptions) -> CompileResult {
    match BlockGraph::from_json(workspace_json) {
        Ok(graph) => compile_to_result(&graph, options),
        Err(e) => CompileResult {
            success: false,
            program: None,
            errors: vec![Diagnostic::new(ErrorCode::MALFORMED_WORKSPACE, e.to_string())],
        },
    }
}
