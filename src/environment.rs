//! Variable environment
//!
//! Maps names to heap addresses, never to values. Environments are
//! persistent: `extend` returns a new environment and leaves the receiver
//! untouched, so a closure keeps seeing exactly the bindings that existed
//! when it was created.

use im::HashMap;

use crate::error::RuntimeError;
use crate::heap::Address;

/// Lexical scope as a persistent name → address map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Address>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Find the address bound to `name`
    pub fn lookup(&self, name: &str) -> Option<Address> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Return a new environment with `name` bound to `address`.
    ///
    /// Fails if `name` is already bound here; bindings are never shadowed.
    pub fn extend(&self, name: &str, address: Address) -> Result<Self, RuntimeError> {
        if self.contains(name) {
            return Err(RuntimeError::AlreadyDeclared(name.to_string()));
        }
        Ok(Self {
            bindings: self.bindings.update(name.to_string(), address),
        })
    }

    /// Return a new environment with `name` bound to `address`, replacing
    /// any binding of the same name. Used for call parameters.
    pub fn bind(&self, name: &str, address: Address) -> Self {
        Self {
            bindings: self.bindings.update(name.to_string(), address),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
