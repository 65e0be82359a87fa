//! Synchronous statement executor (spec.md §4.1).

use crate::ast::{Statement, StatementBlock};
use crate::callable::{Callable, ScriptFunction};
use crate::environment::{Globals, Locals};
use crate::errors::{CalcError, RuntimeError};
use crate::eval::sync::evaluate;
use crate::exec::tick;
use crate::include;
use crate::options::ExecuteOptions;
use crate::value::Value;
use std::rc::Rc;

/// Run a statement sequence to completion (falling off the end yields
/// `Value::Null`) or until a `return` produces a value. `locals` is
/// `None` at top level and while running an `include`d script; `Some`
/// inside a script function's body.
pub fn execute(
    block: &StatementBlock,
    globals: &Globals,
    mut locals: Option<&mut Locals>,
    options: &ExecuteOptions,
) -> Result<Value, CalcError> {
    let mut cursor = 0usize;
    while cursor < block.statements.len() {
        tick(options)?;
        match &block.statements[cursor] {
            Statement::Assign { name, expr } => {
                let value = evaluate(expr, globals, locals.as_deref(), options, true)?;
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
                    Some(e) => evaluate(e, globals, locals.as_deref(), options, true)?.is_truthy(),
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
                    Some(e) => evaluate(e, globals, locals.as_deref(), options, true),
                    None => Ok(Value::Null),
                };
            }
            Statement::Expr { expr } => {
                evaluate(expr, globals, locals.as_deref(), options, true)?;
                cursor += 1;
            }
            Statement::Label { .. } => {
                cursor += 1;
            }
            Statement::Include { url } => {
                run_include(url, globals, options)?;
                cursor += 1;
            }
        }
    }
    Ok(Value::Null)
}

fn run_include(url: &str, globals: &Globals, options: &ExecuteOptions) -> Result<(), CalcError> {
    include::check_include_depth(options)?;
    let resolved_url = include::effective_url(url, options);
    let fetch_fn = options
        .fetch_fn
        .clone()
        .ok_or_else(|| RuntimeError::include_failed(&resolved_url, Some("no fetch function configured")))?;
    let response = include::block_on_send(fetch_fn(resolved_url.clone()));
    let target = include::resolve_fetch(&resolved_url, response, options)?;
    execute(&target.block, globals, None, &target.options)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Expression, Statement};
    use crate::hooks::in_memory_fetch_fn;

    fn run(statements: Vec<Statement>) -> (Result<Value, CalcError>, Globals) {
        let block = StatementBlock::from(statements);
        let globals = Globals::new();
        let options = ExecuteOptions::new();
        let result = execute(&block, &globals, None, &options);
        (result, globals)
    }

    #[test]
    fn test_assign_and_return() {
        let (result, _) = run(vec![
            Statement::Assign { name: "x".to_string(), expr: Expression::Number { value: 41.0 } },
            Statement::Return {
                expr: Some(Expression::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(Expression::Variable { name: "x".to_string() }),
                    right: Box::new(Expression::Number { value: 1.0 }),
                }),
            },
        ]);
        assert!(matches!(result, Ok(Value::Number(n)) if n == 42.0));
    }

    #[test]
    fn test_fall_off_end_yields_null() {
        let (result, _) = run(vec![Statement::Expr { expr: Expression::Number { value: 1.0 } }]);
        assert!(matches!(result, Ok(Value::Null)));
    }

    #[test]
    fn test_jump_skips_statements() {
        let (result, globals) = run(vec![
            Statement::Jump { label: "end".to_string(), expr: None },
            Statement::Assign { name: "skipped".to_string(), expr: Expression::Number { value: 1.0 } },
            Statement::Label { name: "end".to_string() },
        ]);
        assert!(result.is_ok());
        assert!(!globals.contains("skipped"));
    }

    #[test]
    fn test_conditional_jump_not_taken() {
        let (_, globals) = run(vec![
            Statement::Jump {
                label: "end".to_string(),
                expr: Some(Expression::Number { value: 0.0 }),
            },
            Statement::Assign { name: "ran".to_string(), expr: Expression::Number { value: 1.0 } },
            Statement::Label { name: "end".to_string() },
        ]);
        assert!(globals.contains("ran"));
    }

    #[test]
    fn test_unknown_label_is_runtime_error() {
        let (result, _) =
            run(vec![Statement::Jump { label: "nowhere".to_string(), expr: None }]);
        assert!(matches!(result, Err(CalcError::Runtime(_))));
    }

    #[test]
    fn test_label_cache_memoizes_after_first_jump() {
        let block = StatementBlock::from(vec![
            Statement::Jump { label: "loop".to_string(), expr: None },
            Statement::Label { name: "loop".to_string() },
        ]);
        assert_eq!(block.scan_count(), 0);
        assert_eq!(block.resolve_label("loop"), Some(1));
        assert_eq!(block.scan_count(), 1);
        assert_eq!(block.resolve_label("loop"), Some(1));
        assert_eq!(block.scan_count(), 1);
    }

    #[test]
    fn test_function_definition_is_callable() {
        let (result, _) = run(vec![
            Statement::Function {
                name: "double".to_string(),
                is_async: false,
                args: vec!["n".to_string()],
                statements: StatementBlock::from(vec![Statement::Return {
                    expr: Some(Expression::Binary {
                        op: BinaryOp::Mul,
                        left: Box::new(Expression::Variable { name: "n".to_string() }),
                        right: Box::new(Expression::Number { value: 2.0 }),
                    }),
                }]),
            },
            Statement::Return {
                expr: Some(Expression::Call {
                    name: "double".to_string(),
                    args: vec![Expression::Number { value: 21.0 }],
                }),
            },
        ]);
        assert!(matches!(result, Ok(Value::Number(n)) if n == 42.0));
    }

    #[test]
    fn test_statement_quota_exceeded() {
        let block = StatementBlock::from(vec![
            Statement::Label { name: "top".to_string() },
            Statement::Jump { label: "top".to_string(), expr: None },
        ]);
        let globals = Globals::new();
        let mut options = ExecuteOptions::new();
        options.max_statements = 5;
        let result = execute(&block, &globals, None, &options);
        assert!(matches!(result, Err(CalcError::Runtime(_))));
    }

    #[test]
    fn test_include_runs_fetched_script_against_same_globals() {
        let mut sources = std::collections::HashMap::new();
        sources.insert(
            "lib.cs".to_string(),
            serde_json::to_string(&vec![Statement::Assign {
                name: "included".to_string(),
                expr: Expression::Number { value: 7.0 },
            }])
            .unwrap(),
        );
        let block = StatementBlock::from(vec![Statement::Include { url: "lib.cs".to_string() }]);
        let globals = Globals::new();
        let mut options = ExecuteOptions::new();
        options.fetch_fn = Some(in_memory_fetch_fn(sources));
        options.parser = Some(std::sync::Arc::new(crate::parser_trait::JsonScriptParser));
        execute(&block, &globals, None, &options).unwrap();
        assert!(matches!(globals.get("included"), Some(Value::Number(n)) if n == 7.0));
    }

    #[test]
    fn test_include_without_parser_fails() {
        let mut sources = std::collections::HashMap::new();
        sources.insert("lib.cs".to_string(), "[]".to_string());
        let block = StatementBlock::from(vec![Statement::Include { url: "lib.cs".to_string() }]);
        let globals = Globals::new();
        let mut options = ExecuteOptions::new();
        options.fetch_fn = Some(in_memory_fetch_fn(sources));
        let result = execute(&block, &globals, None, &options);
        assert!(matches!(result, Err(CalcError::Runtime(_))));
    }
}
