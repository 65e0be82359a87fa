//! Host Hook Interfaces
//!
//! All optional, provided via `ExecuteOptions`. These are the interfaces
//! only — the actual fetch/log/URL-rewrite behavior is the host's to
//! supply. A couple of reference implementations ship for tests and the
//! CLI demo, the way the teacher crate ships an in-memory filesystem
//! alongside the `FileSystem` trait it defines.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The response to an `include` fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub ok: bool,
    pub status_text: String,
    /// Reading the body can fail independently of `ok` (e.g. a truncated
    /// transfer on an otherwise-200 response) — modeled as a `Result`
    /// rather than a lazy `text()` accessor since by the time a Rust
    /// future resolves the body bytes are already in hand.
    pub body: Result<String, String>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { ok: true, status_text: "OK".to_string(), body: Ok(body.into()) }
    }

    pub fn failed(status_text: impl Into<String>) -> Self {
        Self { ok: false, status_text: status_text.into(), body: Err(String::new()) }
    }
}

/// Fetches the body at `url` for an `include` statement.
///
/// `Send` so the synchronous entry point can drive it to completion on a
/// throwaway thread (see `include::block_on_send`) without nesting an
/// async runtime inside a possibly-already-async caller.
pub type FetchFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = FetchResponse> + Send>> + Send + Sync>;

/// Rewrites an include URL before fetch (e.g. to resolve it relative to a base).
pub type UrlFn = Arc<dyn Fn(String) -> String>;

/// Sink for duration reports, function-failure notices, and user `debugLog` output.
pub type LogFn = Arc<dyn Fn(&str)>;

/// A `LogFn` that writes lines to stderr, for the CLI demo and tests.
pub fn stderr_log_fn() -> LogFn {
    Arc::new(|line: &str| eprintln!("{}", line))
}

/// A `FetchFn` backed by a static in-memory map of URL -> source text, for
/// tests and the CLI `include` demo. Unknown URLs fail with a 404-like
/// response.
pub fn in_memory_fetch_fn(sources: HashMap<String, String>) -> FetchFn {
    let sources = Arc::new(sources);
    Arc::new(move |url: String| {
        let sources = sources.clone();
        Box::pin(async move {
            match sources.get(&url) {
                Some(body) => FetchResponse::ok(body.clone()),
                None => FetchResponse::failed("Not Found"),
            }
        })
    })
}
