//! Asynchronous Expression Evaluator (spec.md §4.5)
//!
//! Mirror of `eval::sync`. Before descending, `is_async` gates a fast
//! path: if the subtree provably can't suspend, delegate the whole thing
//! to the synchronous evaluator. Otherwise recurse with suspension at
//! host-native async invocations; non-`if` call arguments are evaluated
//! concurrently (join semantics); `&&`/`||` and `if` stay sequential and
//! branch-selective.

use crate::asyncness::is_async;
use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::callable::{BoxFuture, Callable, ScriptFunction};
use crate::environment::{Globals, Locals};
use crate::errors::{CalcError, NativeError, RuntimeError};
use crate::eval::join::join_all;
use crate::eval::{apply_binary, is_global_accessor, is_lazy_special_form, resolve_callee, sync, ResolvedCallee};
use crate::options::ExecuteOptions;
use crate::value::Value;

pub fn evaluate_async<'a>(
    expr: &'a Expression,
    globals: &'a Globals,
    locals: Option<&'a Locals>,
    options: &'a ExecuteOptions,
    include_builtins: bool,
) -> BoxFuture<'a, Result<Value, CalcError>> {
    Box::pin(async move {
        if !is_async(expr, globals, locals) {
            return sync::evaluate(expr, globals, locals, options, include_builtins);
        }

        match expr {
            Expression::Number { .. } | Expression::String { .. } | Expression::Variable { .. } => {
                sync::evaluate(expr, globals, locals, options, include_builtins)
            }
            Expression::Unary { op, expr } => {
                let v = evaluate_async(expr, globals, locals, options, include_builtins).await?;
                Ok(match op {
                    UnaryOp::Not => v.not(),
                    UnaryOp::Neg => v.neg(),
                })
            }
            Expression::Group { expr } => {
                evaluate_async(expr, globals, locals, options, include_builtins).await
            }
            Expression::Binary { op, left, right } => {
                let l = evaluate_async(left, globals, locals, options, include_builtins).await?;
                match op {
                    BinaryOp::And => {
                        if !l.is_truthy() {
                            Ok(l)
                        } else {
                            evaluate_async(right, globals, locals, options, include_builtins).await
                        }
                    }
                    BinaryOp::Or => {
                        if l.is_truthy() {
                            Ok(l)
                        } else {
                            evaluate_async(right, globals, locals, options, include_builtins).await
                        }
                    }
                    _ => {
                        let r =
                            evaluate_async(right, globals, locals, options, include_builtins).await?;
                        Ok(apply_binary(*op, &l, &r))
                    }
                }
            }
            Expression::Call { name, args } => {
                call_function_async(name, args, globals, locals, options, include_builtins).await
            }
        }
    })
}

async fn call_function_async(
    name: &str,
    arg_exprs: &[Expression],
    globals: &Globals,
    locals: Option<&Locals>,
    options: &ExecuteOptions,
    include_builtins: bool,
) -> Result<Value, CalcError> {
    if is_lazy_special_form(name) {
        let cond = match arg_exprs.first() {
            Some(e) => evaluate_async(e, globals, locals, options, include_builtins).await?,
            None => Value::Null,
        };
        let branch = if cond.is_truthy() { arg_exprs.get(1) } else { arg_exprs.get(2) };
        return match branch {
            Some(e) => evaluate_async(e, globals, locals, options, include_builtins).await,
            None => Ok(Value::Null),
        };
    }

    let futures: Vec<_> = arg_exprs
        .iter()
        .map(|a| evaluate_async(a, globals, locals, options, include_builtins))
        .collect();
    let results = join_all(futures).await;
    let mut args = Vec::with_capacity(results.len());
    for r in results {
        args.push(r?);
    }

    match resolve_callee(name, globals, locals, options, include_builtins) {
        ResolvedCallee::Callable(callable) => invoke_async(&callable, name, &args, globals, options).await,
        ResolvedCallee::NotCallable => {
            Err(RuntimeError::new(format!("\"{}\" is not a function", name)).into())
        }
        ResolvedCallee::Unresolved if is_global_accessor(name) => global_accessor(name, &args, globals),
        ResolvedCallee::Unresolved => Err(RuntimeError::undefined_function(name).into()),
    }
}

fn global_accessor(name: &str, args: &[Value], globals: &Globals) -> Result<Value, CalcError> {
    let key = args.first().cloned().unwrap_or(Value::Null).to_string();
    match name {
        "getGlobal" => Ok(globals.get(&key).unwrap_or(Value::Null)),
        "setGlobal" => {
            let value = args.get(1).cloned().unwrap_or(Value::Null);
            globals.set(key, value.clone());
            Ok(value)
        }
        _ => unreachable!("caller checked is_global_accessor"),
    }
}

async fn invoke_async(
    callable: &Callable,
    name: &str,
    args: &[Value],
    globals: &Globals,
    options: &ExecuteOptions,
) -> Result<Value, CalcError> {
    match callable {
        Callable::Native(f) => match f(args, options) {
            Ok(v) => Ok(v),
            Err(NativeError::Runtime(e)) => Err(e.into()),
            Err(NativeError::Other(msg)) => {
                options.log(&format!(r#"Error: Function "{}" failed with error: {}"#, name, msg));
                Ok(Value::Null)
            }
        },
        Callable::NativeAsync(f) => match f(args.to_vec(), options.clone()).await {
            Ok(v) => Ok(v),
            Err(NativeError::Runtime(e)) => Err(e.into()),
            Err(NativeError::Other(msg)) => {
                options.log(&format!(r#"Error: Function "{}" failed with error: {}"#, name, msg));
                Ok(Value::Null)
            }
        },
        Callable::Script(func) => invoke_script_async(func, args, globals, options).await,
    }
}

async fn invoke_script_async(
    func: &ScriptFunction,
    args: &[Value],
    globals: &Globals,
    options: &ExecuteOptions,
) -> Result<Value, CalcError> {
    let mut locals = Locals::new();
    for (i, param) in func.params.iter().enumerate() {
        locals.insert(param.clone(), args.get(i).cloned().unwrap_or(Value::Null));
    }
    if func.is_async {
        crate::exec::r#async::execute_async(&func.body, globals, Some(&mut locals), options).await
    } else {
        crate::exec::sync::execute(&func.body, globals, Some(&mut locals), options)
    }
}
