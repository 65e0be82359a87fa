//! Statement Executor
//!
//! Walks a `StatementBlock` by integer cursor rather than recursive
//! descent, so `jump` can retarget control flow by mutating the cursor
//! instead of unwinding a call stack (spec.md §4.1, §4.4). Exists in the
//! same sync/async mirror split as `eval`.

pub mod r#async;
pub mod sync;

use crate::errors::RuntimeError;
use crate::options::ExecuteOptions;

/// Increment and check the shared statement-count quota. Disabled when
/// `max_statements <= 0`.
fn tick(options: &ExecuteOptions) -> Result<(), RuntimeError> {
    if options.max_statements <= 0 {
        return Ok(());
    }
    let next = options.statement_count.get() + 1;
    options.statement_count.set(next);
    if next > options.max_statements {
        return Err(RuntimeError::quota_exceeded(options.max_statements));
    }
    Ok(())
}
