use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Graph,
    Structure,
}

/// Numeric error code (E100–E699).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Editor graph errors (E100–E199) ──
    pub const MALFORMED_WORKSPACE: Self = Self(100);

    // ── Structure errors (E600–E699) ──
    pub const EMPTY_PROGRAM: Self = Self(600);
    pub const MISSING_START: Self = Self(601);
    pub const PROGRAM_TOO_LONG: Self = Self(607);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Graph,
            _ => ErrorCategory::Structure,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph => write!(f, "graph"),
            Self::Structure => write!(f, "structure"),
        }
    }
}

/// A structural rule a compiled program broke.
///
/// The messages are shown to the learner as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Programa vacío.")]
    Empty,

    #[error("El programa debe comenzar con el bloque de inicio.")]
    MissingStart,

    #[error("Programa demasiado largo (máx. {max} bloques).")]
    TooLong { count: usize, max: usize },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Empty => ErrorCode::EMPTY_PROGRAM,
            Self::MissingStart => ErrorCode::MISSING_START,
            Self::TooLong { .. } => ErrorCode::PROGRAM_TOO_LONG,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.code(), self.to_string())
    }
}

/// A structured error for hosts that consume JSON.
///
/// The host renders `message`; it must not parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.code, self.category, self.message)
    }
}

impl From<ValidationError> for Diagnostic {
    fn from(err: ValidationError) -> Self {
        err.to_diagnostic()
    }
}
