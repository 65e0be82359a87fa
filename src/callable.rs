//! Callables
//!
//! Represents callables as a sum type: a host-native function (sync or
//! async) or a user-defined script function. Storing them in the same
//! value domain as data preserves the language's Lisp-like flatness
//! (spec.md §9 design note): a script function bound into `globals` is
//! just another `Value`.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use crate::ast::StatementBlock;
use crate::errors::NativeError;
use crate::options::ExecuteOptions;
use crate::value::Value;

pub type NativeResult = Result<Value, NativeError>;
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A synchronous host-native callable: `(args, options) -> value`.
pub type NativeFn = Arc<dyn Fn(&[Value], &ExecuteOptions) -> NativeResult>;

/// An asynchronous host-native callable.
pub type NativeAsyncFn =
    Arc<dyn Fn(Vec<Value>, ExecuteOptions) -> BoxFuture<'static, NativeResult>>;

/// A user-defined script function: `name(params) { body }`.
#[derive(Debug)]
pub struct ScriptFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: StatementBlock,
    pub is_async: bool,
}

#[derive(Clone)]
pub enum Callable {
    Native(NativeFn),
    NativeAsync(NativeAsyncFn),
    Script(Rc<ScriptFunction>),
}

impl Callable {
    pub fn is_async(&self) -> bool {
        match self {
            Callable::Native(_) => false,
            Callable::NativeAsync(_) => true,
            Callable::Script(f) => f.is_async,
        }
    }

    /// Reference identity, used by `Value::strict_eq`.
    pub fn identity_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Arc::ptr_eq(a, b),
            (Callable::NativeAsync(a), Callable::NativeAsync(b)) => Arc::ptr_eq(a, b),
            (Callable::Script(a), Callable::Script(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "Callable::Native(..)"),
            Callable::NativeAsync(_) => write!(f, "Callable::NativeAsync(..)"),
            Callable::Script(func) => write!(f, "Callable::Script({})", func.name),
        }
    }
}
