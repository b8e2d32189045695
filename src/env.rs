// ABOUTME: Environment module for managing variable bindings and scopes

use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no outer scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a new child environment enclosed by `outer`, for function calls and
    /// block-scoped loop bodies.
    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Looks up a name in this scope, then recursively in enclosing scopes.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(outer) = &self.outer {
            return outer.get(name);
        }

        None
    }

    /// Binds `name` to `value` in THIS scope only. A `let` inside a block always
    /// creates a new local binding rather than rebinding an outer one, so shadowing is
    /// the only way to "update" a name from an enclosed scope.
    pub fn set(&self, name: impl Into<String>, value: Object) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }
}
