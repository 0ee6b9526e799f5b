use crate::engine::builtins::globals::populate_globals;
use crate::engine::eval::LispError;
use crate::engine::value::Value;
use tracing::{debug, trace};

/// The flat global binding table.
///
/// Values cross the boundary by copy in both directions: `put` stores a copy of the
/// caller's value and `get` hands out a copy of the stored one, so no binding is ever
/// shared with a transient expression tree.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Environment {
    bindings: Vec<(String, Value)>,
}

impl Environment {
    /// Creates a new, empty environment without any builtins.
    pub fn new() -> Self {
        debug!("Creating new empty environment");
        Self::default()
    }

    /// Creates a new environment populated with every builtin function.
    pub fn new_with_prelude() -> Self {
        debug!("Creating new environment with prelude");
        let mut env = Self::new();
        populate_globals(&mut env);
        trace!(bindings = env.len(), "Environment after adding prelude");
        env
    }

    /// Looks up `name`, returning a copy of its value or an unbound-symbol Error value.
    pub fn get(&self, name: &str) -> Value {
        trace!(name = %name, "Looking up symbol");
        match self.bindings.iter().find(|(bound, _)| bound == name) {
            Some((_, value)) => value.clone(),
            None => {
                debug!(name = %name, "Symbol is not bound");
                Value::from(LispError::UnboundSymbol(name.to_string()))
            }
        }
    }

    /// Binds `name` to a copy of `value`, replacing any previous binding.
    pub fn put(&mut self, name: &str, value: &Value) {
        trace!(name = %name, value = %value, "Binding symbol");
        match self.bindings.iter_mut().find(|(bound, _)| bound == name) {
            Some((_, slot)) => *slot = value.clone(),
            None => self.bindings.push((name.to_string(), value.clone())),
        }
    }

    /// Bound names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
