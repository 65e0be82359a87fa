//! Environment
//!
//! A pair (locals, globals). Locals is either absent (top-level script and
//! includes) or a mapping created fresh per user-function invocation.
//! Globals is a single mapping shared across the entire execution,
//! including through `include`; user functions close over it by
//! reference, never by copy.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

pub type Locals = HashMap<String, Value>;

/// Shared, mutable global name table. Cloning a `Globals` shares the same
/// underlying map (it's the reference-counted handle, not the map).
#[derive(Clone)]
pub struct Globals(Rc<RefCell<HashMap<String, Value>>>);

impl Globals {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(HashMap::new())))
    }

    pub fn from_map(map: HashMap<String, Value>) -> Self {
        Self(Rc::new(RefCell::new(map)))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    /// Insert `value` under `name` only if the key is not already present
    /// (used to merge the script-function library into globals without
    /// overwriting host-supplied bindings).
    pub fn set_if_absent(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().entry(name.into()).or_insert(value);
    }
}

impl Default for Globals {
    fn default() -> Self {
        Self::new()
    }
}

/// Three reserved names that resolve before any lookup.
pub fn reserved_literal(name: &str) -> Option<Value> {
    match name {
        "null" => Some(Value::Null),
        "false" => Some(Value::Boolean(false)),
        "true" => Some(Value::Boolean(true)),
        _ => None,
    }
}

/// Resolve a variable: reserved literals, then locals (if present), then
/// globals. An undefined name yields `Null`, never an error.
pub fn resolve_variable(name: &str, globals: &Globals, locals: Option<&Locals>) -> Value {
    if let Some(v) = reserved_literal(name) {
        return v;
    }
    if let Some(locals) = locals {
        if let Some(v) = locals.get(name) {
            return v.clone();
        }
    }
    globals.get(name).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locals_shadow_globals() {
        let globals = Globals::new();
        globals.set("x", Value::Number(1.0));
        let mut locals = Locals::new();
        locals.insert("x".to_string(), Value::Number(2.0));
        let resolved = resolve_variable("x", &globals, Some(&locals));
        assert!(matches!(resolved, Value::Number(n) if n == 2.0));
    }

    #[test]
    fn test_undefined_name_is_null() {
        let globals = Globals::new();
        assert!(matches!(resolve_variable("missing", &globals, None), Value::Null));
    }

    #[test]
    fn test_reserved_literals_take_precedence() {
        let globals = Globals::new();
        globals.set("true", Value::Number(99.0));
        assert!(matches!(resolve_variable("true", &globals, None), Value::Boolean(true)));
    }

    #[test]
    fn test_globals_share_handle_across_clones() {
        let globals = Globals::new();
        let clone = globals.clone();
        clone.set("y", Value::Number(5.0));
        assert!(matches!(globals.get("y"), Some(Value::Number(n)) if n == 5.0));
    }

    #[test]
    fn test_set_if_absent_does_not_overwrite() {
        let globals = Globals::new();
        globals.set("z", Value::Number(1.0));
        globals.set_if_absent("z", Value::Number(2.0));
        assert!(matches!(globals.get("z"), Some(Value::Number(n)) if n == 1.0));
    }
}
