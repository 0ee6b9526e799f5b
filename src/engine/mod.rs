//! The core interpreter: values, the global environment, the evaluator, builtins,
//! and the parse-tree boundary.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod parser;
pub mod translate;
pub mod value;
