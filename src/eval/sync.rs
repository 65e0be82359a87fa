//! Synchronous Expression Evaluator (spec.md §4.2, §4.3)

use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::callable::{Callable, ScriptFunction};
use crate::environment::{resolve_variable, Globals, Locals};
use crate::errors::{CalcError, NativeError, RuntimeError};
use crate::eval::{apply_binary, is_global_accessor, is_lazy_special_form, resolve_callee, ResolvedCallee};
use crate::options::ExecuteOptions;
use crate::value::Value;

pub fn evaluate(
    expr: &Expression,
    globals: &Globals,
    locals: Option<&Locals>,
    options: &ExecuteOptions,
    include_builtins: bool,
) -> Result<Value, CalcError> {
    match expr {
        Expression::Number { value } => Ok(Value::Number(*value)),
        Expression::String { value } => Ok(Value::string(value.clone())),
        Expression::Variable { name } => Ok(resolve_variable(name, globals, locals)),
        Expression::Unary { op, expr } => {
            let v = evaluate(expr, globals, locals, options, include_builtins)?;
            Ok(match op {
                UnaryOp::Not => v.not(),
                UnaryOp::Neg => v.neg(),
            })
        }
        Expression::Group { expr } => evaluate(expr, globals, locals, options, include_builtins),
        Expression::Binary { op, left, right } => {
            let l = evaluate(left, globals, locals, options, include_builtins)?;
            match op {
                BinaryOp::And => {
                    if !l.is_truthy() {
                        Ok(l)
                    } else {
                        evaluate(right, globals, locals, options, include_builtins)
                    }
                }
                BinaryOp::Or => {
                    if l.is_truthy() {
                        Ok(l)
                    } else {
                        evaluate(right, globals, locals, options, include_builtins)
                    }
                }
                _ => {
                    let r = evaluate(right, globals, locals, options, include_builtins)?;
                    Ok(apply_binary(*op, &l, &r))
                }
            }
        }
        Expression::Call { name, args } => {
            call_function(name, args, globals, locals, options, include_builtins)
        }
    }
}

fn call_function(
    name: &str,
    arg_exprs: &[Expression],
    globals: &Globals,
    locals: Option<&Locals>,
    options: &ExecuteOptions,
    include_builtins: bool,
) -> Result<Value, CalcError> {
    if is_lazy_special_form(name) {
        let cond = match arg_exprs.first() {
            Some(e) => evaluate(e, globals, locals, options, include_builtins)?,
            None => Value::Null,
        };
        let branch = if cond.is_truthy() { arg_exprs.get(1) } else { arg_exprs.get(2) };
        return match branch {
            Some(e) => evaluate(e, globals, locals, options, include_builtins),
            None => Ok(Value::Null),
        };
    }

    let mut args = Vec::with_capacity(arg_exprs.len());
    for a in arg_exprs {
        args.push(evaluate(a, globals, locals, options, include_builtins)?);
    }

    match resolve_callee(name, globals, locals, options, include_builtins) {
        ResolvedCallee::Callable(callable) => invoke(&callable, name, &args, globals, options),
        ResolvedCallee::NotCallable => {
            Err(RuntimeError::new(format!("\"{}\" is not a function", name)).into())
        }
        ResolvedCallee::Unresolved if is_global_accessor(name) => {
            global_accessor(name, &args, globals)
        }
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

fn invoke(
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
        Callable::NativeAsync(_) => Err(RuntimeError::new(format!(
            "\"{}\" is an async function and cannot be called synchronously",
            name
        ))
        .into()),
        Callable::Script(func) => invoke_script(func, args, globals, options),
    }
}

fn invoke_script(
    func: &ScriptFunction,
    args: &[Value],
    globals: &Globals,
    options: &ExecuteOptions,
) -> Result<Value, CalcError> {
    if func.is_async {
        return Err(RuntimeError::new(format!(
            "\"{}\" is an async function and cannot be called synchronously",
            func.name
        ))
        .into());
    }
    let mut locals = Locals::new();
    for (i, param) in func.params.iter().enumerate() {
        locals.insert(param.clone(), args.get(i).cloned().unwrap_or(Value::Null));
    }
    crate::exec::sync::execute(&func.body, globals, Some(&mut locals), options)
}
