//! Error Taxonomy
//!
//! Two kinds of externally-visible failure, per the runtime's contract:
//! - `RuntimeError`: a structural/contract fault raised by the core itself
//!   (unknown jump label, undefined function, statement quota exceeded,
//!   failed include). Always terminates the script.
//! - `ParserError`: raised by the external script parser; the runtime
//!   re-raises it with an `Included from "URL"` prefix when it arises
//!   from an `include`.

use std::fmt;
use thiserror::Error;

/// All execution failures from the core.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn quota_exceeded(max_statements: i64) -> Self {
        Self::new(format!(
            "Exceeded maximum script statements ({})",
            max_statements
        ))
    }

    pub fn unknown_label(label: &str) -> Self {
        Self::new(format!("Unknown jump label \"{}\"", label))
    }

    pub fn undefined_function(name: &str) -> Self {
        Self::new(format!("Undefined function \"{}\"", name))
    }

    pub fn include_failed(url: &str, error_msg: Option<&str>) -> Self {
        let suffix = match error_msg {
            Some(msg) => format!(" with error: {}", msg),
            None => String::new(),
        };
        Self::new(format!("Include of \"{}\" failed{}", url, suffix))
    }

    pub fn include_depth_exceeded(max_depth: u32) -> Self {
        Self::new(format!(
            "Exceeded maximum include depth ({})",
            max_depth
        ))
    }
}

/// Raised by the external script parser (and re-raised, annotated, from `include`).
#[derive(Debug, Clone, Error)]
pub struct ParserError {
    pub message: String,
    pub line: usize,
    pub column_number: usize,
    pub line_number: usize,
    pub prefix: Option<String>,
}

impl ParserError {
    pub fn new(message: impl Into<String>, line_number: usize, column_number: usize) -> Self {
        Self {
            message: message.into(),
            line: line_number,
            column_number,
            line_number,
            prefix: None,
        }
    }

    /// Re-raise with an `Included from "URL"` annotation, as `include` does.
    pub fn included_from(mut self, url: &str) -> Self {
        self.prefix = Some(format!("Included from \"{}\"", url));
        self
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(
                f,
                "{}: {} at line {}, column {}",
                prefix, self.message, self.line_number, self.column_number
            )
        } else {
            write!(
                f,
                "{} at line {}, column {}",
                self.message, self.line_number, self.column_number
            )
        }
    }
}

/// The crate's single public fallible-result error type.
#[derive(Debug, Clone, Error)]
pub enum CalcError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// The failure of invoking a native (host-supplied) callable.
///
/// Distinguishes a `RuntimeError` (propagated unchanged, per spec) from any
/// other failure (caught, logged via `logFn`, and coalesced to `Value::Null`
/// at the call site).
#[derive(Debug, Clone, Error)]
pub enum NativeError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("{0}")]
    Other(String),
}
