//! Asynchronous statement executor (spec.md §4.1, §4.5).
//!
//! Mirror of `exec::sync`. The only real divergence is `include`: inside
//! an async context the fetch future is awaited directly rather than
//! driven to completion on a throwaway thread.

use crate::ast::{Statement, StatementBlock};
use crate::callable::{BoxFuture, Callable, ScriptFunction};
use crate::environment::{Globals, Locals};
use crate::errors::{CalcError, RuntimeError};
use crate::eval::r#async::evaluate_async;
use crate::exec::tick;
use crate::include;
use crate::options::ExecuteOptions;
use crate::value::Value;
use std::rc::Rc;

pub fn execute_async<'a>(
    block: &'a StatementBlock,
    globals: &'a Globals,
    mut locals: Option<&'a mut Locals>,
    options: &'a ExecuteOptions,
) -> BoxFuture<'a, Result<Value, CalcError>> {
    Box::pin(async move {
        let mut cursor = 0usize;
        while cursor < block.statements.len() {
            tick(options)?;
            match &block.statements[cursor] {
                Statement::Assign { name, expr } => {
                    let value = evaluate_async(expr, globals, locals.as_deref(), options, true).await?;
                    match locals.as_deref_mut() {
                        Some(locals) => {
                            locals.insert(name.clone(), value);
                        }
                        None => globals.set(name.clone(), value),
                    }
                    cursor += 1;
                }
                Statement::Function { name, is_async, args, statements } => {
                    let func = ScriptFunction {
                        name: name.clone(),
                        params: args.clone(),
                        body: statements.clone(),
                        is_async: *is_async,
                    };
                    globals.set(name.clone(), Value::Function(Callable::Script(Rc::new(func))));
                    cursor += 1;
                }
                Statement::Jump { label, expr } => {
                    let should_jump = match expr {
                        Some(e) => {
                            evaluate_async(e, globals, locals.as_deref(), options, true).await?.is_truthy()
                        }
                        None => true,
                    };
                    if should_jump {
                        cursor = block
                            .resolve_label(label)
                            .ok_or_else(|| RuntimeError::unknown_label(label))?;
                    } else {
                        cursor += 1;
                    }
                }
                Statement::Return { expr } => {
                    return match expr {
                        Some(e) => evaluate_async(e, globals, locals.as_deref(), options, true).await,
                        None => Ok(Value::Null),
                    };
                }
                Statement::Expr { expr } => {
                    evaluate_async(expr, globals, locals.as_deref(), options, true).await?;
                    cursor += 1;
                }
                Statement::Label { .. } => {
                    cursor += 1;
                }
                Statement::Include { url } => {
                    run_include_async(url, globals, options).await?;
                    cursor += 1;
                }
            }
        }
        Ok(Value::Null)
    })
}

async fn run_include_async(
    url: &str,
    globals: &Globals,
    options: &ExecuteOptions,
) -> Result<(), CalcError> {
    include::check_include_depth(options)?;
    let resolved_url = include::effective_url(url, options);
    let fetch_fn = options
        .fetch_fn
        .clone()
        .ok_or_else(|| RuntimeError::include_failed(&resolved_url, Some("no fetch function configured")))?;
    let response = fetch_fn(resolved_url.clone()).await;
    let target = include::resolve_fetch(&resolved_url, response, options)?;
    execute_async(&target.block, globals, None, &target.options).await?;
    Ok(())
}
