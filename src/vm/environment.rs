//! Name bindings.
//!
//! The VM keeps one global environment for the entry function and one
//! local environment per user-function call. A local environment's parent
//! is always the global one: functions see their own bindings and the
//! module-level ones, never their caller's.

use rustc_hash::FxHashMap;

use super::value::Value;

/// Names bound to values in one scope.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: FxHashMap<String, Value>,
}

impl Environment {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value bound to `name` in this scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bind `name`, replacing any previous binding in this scope.
    pub fn put(&mut self, name: &str, value: Value) {
        match self.bindings.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.bindings.insert(name.to_string(), value);
            }
        }
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A call's view of its environment chain.
pub(crate) struct Scope<'e> {
    pub(crate) locals: Option<&'e mut Environment>,
    pub(crate) globals: &'e mut Environment,
}

impl Scope<'_> {
    /// Search the local scope, then the globals.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Value> {
        self.locals
            .as_deref()
            .and_then(|locals| locals.get(name))
            .or_else(|| self.globals.get(name))
    }

    /// Bind in the innermost scope.
    pub(crate) fn store(&mut self, name: &str, value: Value) {
        match self.locals.as_deref_mut() {
            Some(locals) => locals.put(name, value),
            None => self.globals.put(name, value),
        }
    }
}
