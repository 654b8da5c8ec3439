//! Structural checks run before a program is handed to the runtime.

use gridbot_types::{Program, ValidationError, MAX_OPS};

/// Check that `program` is runnable.
///
/// Rules, in the order they are checked:
/// 1. at least one op,
/// 2. the first top-level op is a start op,
/// 3. at most [`MAX_OPS`] ops, nested repeat bodies included.
pub fn validate(program: &Program) -> gridbot_types::Result<()> {
    if program.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !program.starts_with_start() {
        return Err(ValidationError::MissingStart);
    }
    let count = program.op_count();
    if count > MAX_OPS {
        return Err(ValidationError::TooLong {
            count,
            max: MAX_OPS,
        });
    }
    Ok(())
}
