//! Shared types for Gridbot.
//!
//! This crate defines the compiled op tree produced from the block editor,
//! the structural limits a program must respect, and the error types shared
//! by the compiler and the runtime.

mod error;
pub mod ast;

pub use ast::{Direction, Op, Program};
pub use error::{Diagnostic, ErrorCategory, ErrorCode, ValidationError};

/// Maximum number of ops (nested repeat bodies included) a program may hold.
pub const MAX_OPS: usize = 200;

/// Result type used by program validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
