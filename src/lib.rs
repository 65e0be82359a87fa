//! calc-script - a sandboxed, embeddable tree-walking runtime for the
//! CalcScript scripting language.
//!
//! A script is a `StatementBlock`: an ordered sequence of statements
//! (assignment, function definition, conditional jump, return, a bare
//! expression, a label, or an include) executed by integer cursor rather
//! than recursive descent, so `jump` can retarget control flow without
//! unwinding a call stack. Expressions are numbers, strings, variables,
//! calls, binary/unary operators, and parenthesized groups, evaluated by
//! a small recursive-descent-free walker. Both the executor and the
//! evaluator exist in sync and async mirrors sharing identical semantics;
//! `is_async` gates async evaluation onto the cheaper sync path whenever
//! a subtree provably can't suspend.

pub mod ast;
pub mod asyncness;
pub mod callable;
pub mod environment;
pub mod errors;
pub mod eval;
pub mod exec;
pub mod hooks;
pub mod include;
pub mod options;
pub mod parser_trait;
pub mod url;
pub mod value;

pub use ast::{BinaryOp, Expression, Statement, StatementBlock, UnaryOp};
pub use callable::{Callable, NativeAsyncFn, NativeFn, NativeResult, ScriptFunction};
pub use environment::{Globals, Locals};
pub use errors::{CalcError, NativeError, ParserError, RuntimeError};
pub use hooks::{in_memory_fetch_fn, stderr_log_fn, FetchFn, FetchResponse, LogFn, UrlFn};
pub use options::{ExecuteOptions, ExpressionBuiltins, ScriptBuiltins};
pub use parser_trait::{JsonScriptParser, ScriptParser};
pub use url::{base_url, is_relative_url};
pub use value::{format_number, Value, ValueArray, ValueObject};

/// Merge `options.script_builtins` into `globals` without overwriting
/// names the host (or a prior `execute_script` call sharing these
/// globals) already bound.
fn install_script_builtins(globals: &Globals, options: &ExecuteOptions) {
    for (name, f) in options.script_builtins.iter() {
        globals.set_if_absent(name.clone(), Value::Function(Callable::Native(f.clone())));
    }
}

/// Run a script to completion. Resets the shared statement-count quota,
/// installs the script-function library into `globals`, then executes
/// `block` with no locals (top-level scope).
pub fn execute_script(
    block: &StatementBlock,
    globals: &Globals,
    options: &ExecuteOptions,
) -> Result<Value, CalcError> {
    options.reset_statement_count();
    install_script_builtins(globals, options);
    exec::sync::execute(block, globals, None, options)
}

/// Async mirror of [`execute_script`].
pub async fn execute_script_async(
    block: &StatementBlock,
    globals: &Globals,
    options: &ExecuteOptions,
) -> Result<Value, CalcError> {
    options.reset_statement_count();
    install_script_builtins(globals, options);
    exec::r#async::execute_async(block, globals, None, options).await
}

/// Evaluate a single expression against `globals` and an optional `locals`
/// scope. `include_builtins` gates whether `options.expr_builtins` is
/// consulted during callee resolution.
pub fn evaluate_expression(
    expr: &Expression,
    globals: &Globals,
    locals: Option<&Locals>,
    options: &ExecuteOptions,
    include_builtins: bool,
) -> Result<Value, CalcError> {
    eval::sync::evaluate(expr, globals, locals, options, include_builtins)
}

/// Async mirror of [`evaluate_expression`].
pub async fn evaluate_expression_async(
    expr: &Expression,
    globals: &Globals,
    locals: Option<&Locals>,
    options: &ExecuteOptions,
    include_builtins: bool,
) -> Result<Value, CalcError> {
    eval::r#async::evaluate_async(expr, globals, locals, options, include_builtins).await
}
