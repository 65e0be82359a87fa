//! Include
//!
//! Shared logic behind `Statement::Include`, used by both the sync and
//! async statement executors (spec.md §4.4). Given an `include` statement
//! with a URL string: apply `url_fn` if set, fetch, and on success parse
//! the body and hand back a `StatementBlock` plus the per-include
//! `ExecuteOptions` (relative-URL-aware, depth-checked, globals
//! unchanged).

use std::future::Future;

use crate::ast::StatementBlock;
use crate::errors::RuntimeError;
use crate::hooks::{FetchResponse, UrlFn};
use crate::options::ExecuteOptions;
use crate::url::{base_url, is_relative_url};

/// What the `include` dispatch needs in order to execute the fetched script.
pub struct IncludeTarget {
    pub block: StatementBlock,
    pub options: ExecuteOptions,
}

/// Turn a completed fetch response into a `StatementBlock` + scoped
/// options, or a `RuntimeError`/`ParserError`-bearing `CalcError`.
pub fn resolve_fetch(
    url: &str,
    response: FetchResponse,
    options: &ExecuteOptions,
) -> Result<IncludeTarget, crate::errors::CalcError> {
    if !response.ok {
        return Err(RuntimeError::include_failed(url, Some(&response.status_text)).into());
    }
    let body = response
        .body
        .map_err(|err| RuntimeError::include_failed(url, Some(&err)))?;

    let parser = options
        .parser
        .as_ref()
        .ok_or_else(|| RuntimeError::new("No script parser configured for include"))?;

    let block = parser
        .parse(&body)
        .map_err(|e| e.included_from(url))?;

    let base = base_url(url);
    let url_fn: UrlFn = std::sync::Arc::new(move |u: String| {
        if is_relative_url(&u) {
            format!("{}{}", base, u)
        } else {
            u
        }
    });

    Ok(IncludeTarget { block, options: options.for_include(url_fn) })
}

pub fn effective_url(url: &str, options: &ExecuteOptions) -> String {
    match &options.url_fn {
        Some(url_fn) => url_fn(url.to_string()),
        None => url.to_string(),
    }
}

pub fn check_include_depth(options: &ExecuteOptions) -> Result<(), RuntimeError> {
    if options.max_include_depth > 0 && options.include_depth >= options.max_include_depth {
        return Err(RuntimeError::include_depth_exceeded(options.max_include_depth));
    }
    Ok(())
}

/// Drive a `Send` future to completion on a throwaway thread, so the
/// synchronous entry point can support `include` (whose `fetch_fn` is
/// inherently async) without nesting a runtime inside a possibly
/// already-async caller and without blocking whatever runtime the caller
/// might itself be on.
pub fn block_on_send<T, F>(fut: F) -> T
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    std::thread::scope(|scope| {
        scope
            .spawn(|| {
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to start include fetch runtime")
                    .block_on(fut)
            })
            .join()
            .expect("include fetch thread panicked")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::errors::CalcError;
    use crate::parser_trait::JsonScriptParser;
    use std::sync::Arc;

    #[test]
    fn test_resolve_fetch_rejects_failed_response() {
        let options = ExecuteOptions::new();
        let response = FetchResponse::failed("404 Not Found");
        let result = resolve_fetch("lib.cs", response, &options);
        assert!(matches!(result, Err(CalcError::Runtime(_))));
    }

    #[test]
    fn test_resolve_fetch_requires_parser() {
        let options = ExecuteOptions::new();
        let response = FetchResponse::ok("[]");
        let result = resolve_fetch("lib.cs", response, &options);
        assert!(matches!(result, Err(CalcError::Runtime(_))));
    }

    #[test]
    fn test_resolve_fetch_parses_body_and_scopes_include_depth() {
        let mut options = ExecuteOptions::new();
        options.parser = Some(Arc::new(JsonScriptParser));
        let body = serde_json::to_string(&vec![Statement::Label { name: "x".to_string() }]).unwrap();
        let target = resolve_fetch("http://h/a/lib.cs", FetchResponse::ok(body), &options).unwrap();
        assert_eq!(target.block.statements.len(), 1);
        assert_eq!(target.options.include_depth, 1);
    }

    #[test]
    fn test_check_include_depth_rejects_at_limit() {
        let mut options = ExecuteOptions::new();
        options.max_include_depth = 2;
        options.include_depth = 2;
        assert!(check_include_depth(&options).is_err());
    }
}
