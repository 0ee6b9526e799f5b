use crate::engine::env::Environment;
use crate::engine::value::{Value, ValueKind};
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

/// Everything that can go wrong while evaluating. Each variant is turned into an
/// `Error` value before it becomes visible to the program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    #[error("Unbound symbol '{0}'")]
    UnboundSymbol(String),
    #[error("Wrong number of arguments for function '{function}' ({got} for {expected})")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("Function '{function}' expects at least {min} argument(s), got {got}")]
    TooFewArguments {
        function: String,
        min: usize,
        got: usize,
    },
    #[error(
        "Invalid type for argument {index} to function '{function}' (expected: '{expected}', got: '{got}')"
    )]
    TypeMismatch {
        function: String,
        index: usize,
        expected: ValueKind,
        got: ValueKind,
    },
    #[error(
        "Function '{function}' cannot operate on empty lists, an empty list was found at argument {index}"
    )]
    EmptyList { function: String, index: usize },
    #[error("Division By Zero!")]
    DivisionByZero,
    #[error("Integer overflow in function '{0}'")]
    Overflow(String),
    #[error("Function '^' cannot raise to negative power {0}")]
    NegativeExponent(i64),
    #[error("S-Expression must begin with a function, found '{0}'")]
    NotAFunction(ValueKind),
    #[error("Function 'def' cannot define non-symbol (argument {index} is '{got}')")]
    NonSymbolBinding { index: usize, got: ValueKind },
    #[error(
        "Function 'def' cannot define incorrect number of values to symbols ({symbols} symbols, {values} values)"
    )]
    BindingCountMismatch { symbols: usize, values: usize },
    #[error("Unknown function '{0}'")]
    UnknownBuiltin(String),
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Expected a sequence, found '{0}'")]
    NotASequence(ValueKind),
}

/// Reduces a value. Symbols resolve through `env`, S-Expressions are applied, and
/// everything else evaluates to itself.
#[instrument(skip(env, value), fields(value = %value), ret(Display))]
pub fn eval(env: &mut Environment, value: Value) -> Value {
    match value {
        Value::Symbol(name) => {
            let resolved = env.get(&name);
            if resolved.is_error() {
                error!(symbol_name = %name, "Symbol could not be resolved");
            }
            resolved
        }
        Value::SExpr(cells) => eval_sexpr(env, cells),
        other => {
            trace!(kind = %other.kind(), "Value is self-evaluating");
            other
        }
    }
}

/// Evaluates the children of an S-Expression left to right, then applies the first
/// to the rest. The first Error produced wins; later siblings are never evaluated.
pub fn eval_sexpr(env: &mut Environment, cells: Vec<Value>) -> Value {
    let mut evaluated = Vec::with_capacity(cells.len());
    for cell in cells {
        let value = eval(env, cell);
        if value.is_error() {
            debug!(error = %value, "Child evaluated to an error, abandoning S-Expression");
            return value;
        }
        evaluated.push(value);
    }

    match evaluated.len() {
        0 => return Value::SExpr(evaluated),
        1 => return evaluated.pop().unwrap_or_else(Value::sexpr),
        _ => {}
    }

    let args = evaluated.split_off(1);
    match evaluated.pop() {
        Some(Value::Function(builtin)) => {
            debug!(function = builtin.name(), argc = args.len(), "Applying builtin");
            builtin.call(env, args).unwrap_or_else(Value::from)
        }
        Some(other) => {
            error!(found = %other, "First element of S-Expression is not a function");
            Value::from(LispError::NotAFunction(other.kind()))
        }
        None => Value::sexpr(),
    }
}
