//! Lexically scoped environments.
//!
//! Grounded on `original_source/src/interpreter.py`'s `Environment`
//! class: a name→value map plus an optional link to an enclosing
//! environment, walked outward on lookup and assignment. Represented
//! here as a reference-counted, interior-mutable chain of frames so a
//! closure can share its captured frame with the code that goes on
//! mutating it after the closure is created (§9's "arena-with-shared-
//! parents" guidance, implemented via `Rc<RefCell<_>>` rather than an
//! arena-with-indices, since the core never needs to free a frame
//! before the whole `run` completes).

use crate::error::{Error, Result};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct Scope {
    values: HashMap<String, Value>,
    enclosing: Option<Env>,
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope").field("names", &self.values.keys().collect::<Vec<_>>()).finish()
    }
}

/// A handle to one scope frame. Cheap to clone; clones alias the same
/// underlying frame.
#[derive(Clone, Debug)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    pub fn global() -> Self {
        Env(Rc::new(RefCell::new(Scope { values: HashMap::new(), enclosing: None })))
    }

    /// A fresh child scope enclosed by `self`. Used for function calls
    /// (enclosed by the closure's captured environment) and blocks
    /// (enclosed by the environment active at entry).
    pub fn child(&self) -> Self {
        Env(Rc::new(RefCell::new(Scope { values: HashMap::new(), enclosing: Some(self.clone()) })))
    }

    /// Binds `name` in this frame, shadowing or overwriting any
    /// existing binding of the same name in this frame.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().values.insert(name.into(), value);
    }

    /// Walks the chain from this frame outward; the first match wins.
    pub fn get(&self, name: &str, line: usize) -> Result<Value> {
        let scope = self.0.borrow();
        if let Some(value) = scope.values.get(name) {
            return Ok(value.clone());
        }
        match &scope.enclosing {
            Some(parent) => parent.get(name, line),
            None => Err(Error::runtime(format!("Undefined variable '{name}'"), line)),
        }
    }

    /// Walks the chain from this frame outward and mutates the first
    /// matching binding. Assigning to a name that is bound nowhere in
    /// the chain is a runtime error.
    pub fn assign(&self, name: &str, value: Value, line: usize) -> Result<()> {
        let mut scope = self.0.borrow_mut();
        if scope.values.contains_key(name) {
            scope.values.insert(name.to_string(), value);
            return Ok(());
        }
        match &scope.enclosing {
            Some(parent) => parent.assign(name, value, line),
            None => Err(Error::runtime(format!("Undefined variable '{name}'"), line)),
        }
    }
}

impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Env::global();
        parent.define("x", Value::Int(1));
        let child = parent.child();
        assert_eq!(child.get("x", 1).unwrap(), Value::Int(1));
    }

    #[test]
    fn shadowing_in_child_does_not_affect_parent() {
        let parent = Env::global();
        parent.define("x", Value::Int(1));
        let child = parent.child();
        child.define("x", Value::Int(2));
        assert_eq!(child.get("x", 1).unwrap(), Value::Int(2));
        assert_eq!(parent.get("x", 1).unwrap(), Value::Int(1));
    }

    #[test]
    fn assign_mutates_through_the_chain() {
        let parent = Env::global();
        parent.define("x", Value::Int(1));
        let child = parent.child();
        child.assign("x", Value::Int(9), 1).unwrap();
        assert_eq!(parent.get("x", 1).unwrap(), Value::Int(9));
    }

    #[test]
    fn undefined_lookup_is_a_runtime_error() {
        let env = Env::global();
        assert!(env.get("missing", 3).is_err());
    }

    #[test]
    fn undefined_assignment_is_a_runtime_error() {
        let env = Env::global();
        assert!(env.assign("missing", Value::Nil, 3).is_err());
    }
}
