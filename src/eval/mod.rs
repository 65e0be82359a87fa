//! Expression Evaluator
//!
//! Exists in two mirror implementations (`sync`, `r#async`) sharing
//! identical semantics, per spec.md §2/§9: a language without cheap
//! zero-cost suspension keeps two thin shells around a shared value-level
//! core rather than forcing every evaluation through an async state
//! machine. This module holds that shared core: binary-operator
//! application and the three-tier callee resolution used by both.

pub mod sync;
pub mod r#async;
pub mod join;

use crate::ast::BinaryOp;
use crate::callable::Callable;
use crate::environment::{Globals, Locals};
use crate::value::Value;

/// `if` is checked before ordinary resolution (spec.md §4.3 step 1): its
/// branch is chosen without evaluating the other one.
pub fn is_lazy_special_form(name: &str) -> bool {
    name == "if"
}

/// `getGlobal`/`setGlobal` are the "two built-in accessors" spec.md §4.3
/// step 3 consults only once locals/globals/builtins resolution comes back
/// `Unresolved` — ordinary bindings of the same name shadow them.
pub fn is_global_accessor(name: &str) -> bool {
    matches!(name, "getGlobal" | "setGlobal")
}

/// Result of resolving a call's callee against locals, globals, and (if
/// requested) the expression builtin table.
pub enum ResolvedCallee {
    Callable(Callable),
    /// The name resolved to a value, but it isn't callable.
    NotCallable,
    Unresolved,
}

pub fn resolve_callee(
    name: &str,
    globals: &Globals,
    locals: Option<&Locals>,
    options: &crate::options::ExecuteOptions,
    include_builtins: bool,
) -> ResolvedCallee {
    if let Some(locals) = locals {
        if let Some(v) = locals.get(name) {
            return match v {
                Value::Function(c) => ResolvedCallee::Callable(c.clone()),
                _ => ResolvedCallee::NotCallable,
            };
        }
    }
    if let Some(v) = globals.get(name) {
        return match v {
            Value::Function(c) => ResolvedCallee::Callable(c),
            _ => ResolvedCallee::NotCallable,
        };
    }
    if include_builtins {
        if let Some(f) = options.expr_builtins.get(name) {
            return ResolvedCallee::Callable(Callable::Native(f.clone()));
        }
    }
    ResolvedCallee::Unresolved
}

/// Apply a non-short-circuit binary operator. Never fails: division by
/// zero and NaN propagate through host-native float semantics.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Pow => left.pow(right),
        BinaryOp::Mul => left.mul(right),
        BinaryOp::Div => left.div(right),
        BinaryOp::Rem => left.rem(right),
        BinaryOp::Add => left.add(right),
        BinaryOp::Sub => left.sub(right),
        BinaryOp::Eq => Value::Boolean(left.strict_eq(right)),
        BinaryOp::Ne => Value::Boolean(!left.strict_eq(right)),
        BinaryOp::Lt => Value::Boolean(matches!(left.compare(right), Some(std::cmp::Ordering::Less))),
        BinaryOp::Le => Value::Boolean(matches!(
            left.compare(right),
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Boolean(matches!(left.compare(right), Some(std::cmp::Ordering::Greater))),
        BinaryOp::Ge => Value::Boolean(matches!(
            left.compare(right),
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
        )),
        // Short-circuit operators are handled by the caller before reaching
        // here; listed for exhaustiveness only.
        BinaryOp::And | BinaryOp::Or => unreachable!("short-circuit ops handled by caller"),
    }
}
