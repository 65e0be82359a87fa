//! Execution Options
//!
//! A configuration record carried through every evaluator/executor call:
//! the statement quota and its shared counter, the host hooks, the two
//! builtin tiers, and (ambient addition) an include-depth guard.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::callable::NativeFn;
use crate::hooks::{FetchFn, LogFn, UrlFn};
use crate::parser_trait::ScriptParser;

pub const DEFAULT_MAX_STATEMENTS: i64 = 10_000_000;
pub const DEFAULT_MAX_INCLUDE_DEPTH: u32 = 32;

/// The expression-level builtin table: consulted during function-call
/// resolution only when `include_builtins` is true and the name isn't
/// shadowed by locals/globals. Built-in expression functions are
/// synchronous by construction (spec.md §4.6).
#[derive(Default, Clone)]
pub struct ExpressionBuiltins(HashMap<String, NativeFn>);

impl ExpressionBuiltins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, f: NativeFn) {
        self.0.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<&NativeFn> {
        self.0.get(name)
    }
}

/// The script-function library merged into `globals` at the entry point,
/// without overwriting keys already present.
#[derive(Default, Clone)]
pub struct ScriptBuiltins(HashMap<String, NativeFn>);

impl ScriptBuiltins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, f: NativeFn) {
        self.0.insert(name.into(), f);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NativeFn)> {
        self.0.iter()
    }
}

#[derive(Clone)]
pub struct ExecuteOptions {
    /// When <= 0 the quota is disabled. Default 10,000,000.
    pub max_statements: i64,
    /// Shared across includes and nested function calls; reset by the entry point.
    pub statement_count: Rc<Cell<i64>>,
    pub log_fn: Option<LogFn>,
    pub fetch_fn: Option<FetchFn>,
    pub url_fn: Option<UrlFn>,
    /// Required to use `include` at all (see `parser_trait`).
    pub parser: Option<Arc<dyn ScriptParser>>,
    /// Ambient guard against runaway `include` chains; not in spec.md's
    /// options record but necessary since the statement quota does not
    /// obviously bound include recursion before the included script's own
    /// statements start counting.
    pub max_include_depth: u32,
    pub include_depth: u32,
    pub expr_builtins: Rc<ExpressionBuiltins>,
    pub script_builtins: Rc<ScriptBuiltins>,
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self {
            max_statements: DEFAULT_MAX_STATEMENTS,
            statement_count: Rc::new(Cell::new(0)),
            log_fn: None,
            fetch_fn: None,
            url_fn: None,
            parser: None,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            include_depth: 0,
            expr_builtins: Rc::new(ExpressionBuiltins::new()),
            script_builtins: Rc::new(ScriptBuiltins::new()),
        }
    }

    pub fn reset_statement_count(&self) {
        self.statement_count.set(0);
    }

    pub fn log(&self, line: &str) {
        if let Some(ref log_fn) = self.log_fn {
            log_fn(line);
        }
    }

    /// A clone suitable for running an included script: same counters and
    /// hooks, `url_fn` swapped to resolve relative URLs against the
    /// including script's base, include depth incremented.
    pub fn for_include(&self, url_fn: UrlFn) -> Self {
        let mut next = self.clone();
        next.url_fn = Some(url_fn);
        next.include_depth += 1;
        next
    }
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self::new()
    }
}
