use crate::engine::builtins::Builtin;
use crate::engine::env::Environment;
use crate::engine::value::Value;
use tracing::trace;

/// Populates the given environment with every builtin function.
pub fn populate_globals(env: &mut Environment) {
    for builtin in Builtin::ALL {
        trace!(name = builtin.name(), "Installing builtin");
        env.put(builtin.name(), &Value::function(*builtin));
    }
}
