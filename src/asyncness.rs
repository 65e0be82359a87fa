//! Async-ness Predicate
//!
//! A structural, cheap, side-effect-free check that decides whether an
//! expression subtree may be evaluated by the synchronous fast path. The
//! predicate is advisory but must not under-report: a `false` result is a
//! correct basis for choosing the sync path.

use crate::ast::Expression;
use crate::environment::{Globals, Locals};

/// Resolve a call's callee the same way the evaluator would for the
/// purpose of the async check: locals, then globals — never builtins,
/// since built-in expression functions are synchronous by construction.
fn callee_is_async(name: &str, globals: &Globals, locals: Option<&Locals>) -> bool {
    if let Some(locals) = locals {
        if let Some(v) = locals.get(name) {
            if let crate::value::Value::Function(c) = v {
                return c.is_async();
            }
            return false;
        }
    }
    if let Some(crate::value::Value::Function(c)) = globals.get(name) {
        return c.is_async();
    }
    false
}

pub fn is_async(expr: &Expression, globals: &Globals, locals: Option<&Locals>) -> bool {
    match expr {
        Expression::Call { name, args } => {
            callee_is_async(name, globals, locals)
                || args.iter().any(|a| is_async(a, globals, locals))
        }
        Expression::Binary { left, right, .. } => {
            is_async(left, globals, locals) || is_async(right, globals, locals)
        }
        Expression::Unary { expr, .. } | Expression::Group { expr } => {
            is_async(expr, globals, locals)
        }
        Expression::Number { .. } | Expression::String { .. } | Expression::Variable { .. } => {
            false
        }
    }
}
