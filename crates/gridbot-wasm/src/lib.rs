//! Gridbot compiler as a WASM module for the block editor page.
//!
//! Everything crosses the boundary as JSON strings, so the host only needs
//! `JSON.parse`.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { compile, validate } from 'gridbot-wasm';
//!
//! await init();
//!
//! const workspace = JSON.stringify(editor.save());
//! const result = JSON.parse(compile(workspace, ""));
//! // { success: true, program: { ops: [...] }, errors: [] }
//! ```

use gridbot_compiler::{CompileOptions, CompileResult};
use gridbot_types::{Diagnostic, ErrorCode, Program, MAX_OPS};
use wasm_bindgen::prelude::*;

/// Compile an editor workspace and validate the result.
///
/// `options_json` is a serialized `CompileOptions`; an empty string selects
/// the maze vocabulary. Returns a JSON `CompileResult`:
/// ```json
/// { "success": false, "program": { "ops": [] }, "errors": [
///   { "code": 600, "category": "structure", "message": "Programa vacío." } ] }
/// ```
#[wasm_bindgen]
pub fn compile(workspace_json: &str, options_json: &str) -> String {
    let result = match parse_options(options_json) {
        Ok(options) => gridbot_compiler::compile_json(workspace_json, &options),
        Err(e) => CompileResult {
            success: false,
            program: None,
            errors: vec![Diagnostic::new(
                ErrorCode::MALFORMED_WORKSPACE,
                format!("invalid compile options: {e}"),
            )],
        },
    };
    serde_json::to_string(&result).unwrap_or_else(|e| serialization_failure(&e, true))
}

/// Validate an already compiled program.
///
/// Returns a JSON list of diagnostics, empty when the program is runnable.
#[wasm_bindgen]
pub fn validate(program_json: &str) -> String {
    let errors: Vec<Diagnostic> = match serde_json::from_str::<Program>(program_json) {
        Ok(program) => gridbot_compiler::validate(&program)
            .err()
            .map(|e| e.to_diagnostic())
            .into_iter()
            .collect(),
        Err(e) => vec![Diagnostic::new(
            ErrorCode::MALFORMED_WORKSPACE,
            format!("invalid program: {e}"),
        )],
    };
    serde_json::to_string(&errors).unwrap_or_else(|e| serialization_failure(&e, false))
}

/// Largest number of ops a program may hold.
#[wasm_bindgen]
pub fn max_ops() -> u32 {
    MAX_OPS as u32
}

/// Return the compiler version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn parse_options(options_json: &str) -> Result<CompileOptions, serde_json::Error> {
    if options_json.trim().is_empty() {
        return Ok(CompileOptions::maze());
    }
    CompileOptions::from_json(options_json)
}

fn serialization_failure(e: &serde_json::Error, wrapped: bool) -> String {
    let message = serde_json::Value::String(format!("Serialization error: {e}"));
    let error = format!(r#"{{"code":100,"category":"graph","message":{message}}}"#);
    if wrapped {
        format!(r#"{{"success":false,"program":null,"errors":[{error}]}}"#)
    } else {
        format!("[{error}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const WORKSPACE: &str = r#"{ "blocks": { "blocks": [
        { "type": "maze_start", "id": "s",
          "next": { "block": { "type": "maze_move_forward", "id": "m" } } }
    ] } }"#;

    #[test]
    fn compile_with_default_vocabulary() {
        let out: Value = serde_json::from_str(&compile(WORKSPACE, "")).unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["program"]["ops"][1]["type"], "move");
        assert_eq!(out["program"]["ops"][1]["steps"], 1);
        assert_eq!(out["errors"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn compile_with_custom_vocabulary() {
        let options = r#"{ "start": "go", "move": ["step"] }"#;
        let workspace = r#"{ "blocks": { "blocks": [
            { "type": "go", "id": "a", "next": { "block": { "type": "step", "id": "b" } } }
        ] } }"#;
        let out: Value = serde_json::from_str(&compile(workspace, options)).unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["program"]["ops"][0]["blockId"], "a");
    }

    #[test]
    fn bad_options_are_reported() {
        let out: Value = serde_json::from_str(&compile(WORKSPACE, "{")).unwrap();
        assert_eq!(out["success"], false);
        assert_eq!(out["errors"][0]["code"], 100);
    }

    #[test]
    fn validate_reports_missing_start() {
        let program = r#"{ "ops": [ { "type": "wait", "ms": 10, "blockId": "w" } ] }"#;
        let out: Value = serde_json::from_str(&validate(program)).unwrap();
        assert_eq!(out[0]["code"], 601);
        assert_eq!(
            out[0]["message"],
            "El programa debe comenzar con el bloque de inicio."
        );
    }

    #[test]
    fn validate_accepts_runnable_program() {
        let program = r#"{ "ops": [ { "type": "start", "blockId": "s" } ] }"#;
        assert_eq!(validate(program), "[]");
    }

    #[test]
    fn limits_and_version() {
        assert_eq!(max_ops(), 200);
        assert!(!version().is_empty());
    }

    #[test]
    fn fallback_is_valid_json() {
        let e = serde_json::from_str::<Value>("{").unwrap_err();
        let wrapped: Value = serde_json::from_str(&serialization_failure(&e, true)).unwrap();
        assert_eq!(wrapped["errors"][0]["code"], 100);
        let bare: Value = serde_json::from_str(&serialization_failure(&e, false)).unwrap();
        assert!(bare.is_array());
    }
}
