//! URL Helpers
//!
//! Small, cheap helpers for relative-include resolution (spec.md §4.7).

/// True iff `u` does not start with a scheme (`[a-zA-Z]+:`), `/`, `?`, or `#`.
pub fn is_relative_url(u: &str) -> bool {
    if u.starts_with('/') || u.starts_with('?') || u.starts_with('#') {
        return false;
    }
    match u.find(':') {
        Some(idx) if idx > 0 => !u[..idx].chars().all(|c| c.is_ascii_alphabetic()),
        _ => true,
    }
}

/// The prefix of `u` up to and including the final `/`, or `""` if none.
pub fn base_url(u: &str) -> String {
    match u.rfind('/') {
        Some(idx) => u[..=idx].to_string(),
        None => String::new(),
    }
}
