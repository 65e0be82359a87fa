//! Script Parser Seam
//!
//! The textual CalcScript grammar is an external collaborator (spec.md
//! §1's "out of scope" list) — this crate never tokenizes source text
//! itself. But `include` (spec.md §4.4) is a core operation that *does*
//! need to turn fetched source into a `StatementBlock`, so the runtime
//! defines this trait as the seam and requires the host to supply an
//! implementation via `ExecuteOptions::parser` to use `include` at all.
//!
//! `JsonScriptParser` is the one parser this crate ships: it treats the
//! fetched body as the JSON-encoded script model directly (the shape
//! `StatementBlock` already deserializes via `serde`), which is enough to
//! exercise `include` in tests and the CLI demo without inventing a
//! textual grammar.

use crate::ast::StatementBlock;
use crate::errors::ParserError;

pub trait ScriptParser {
    fn parse(&self, source: &str) -> Result<StatementBlock, ParserError>;
}

/// Parses a fetched body as a JSON-encoded script model.
pub struct JsonScriptParser;

impl ScriptParser for JsonScriptParser {
    fn parse(&self, source: &str) -> Result<StatementBlock, ParserError> {
        serde_json::from_str(source).map_err(|e| {
            ParserError::new(e.to_string(), e.line(), e.column())
        })
    }
}
