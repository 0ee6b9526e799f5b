use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::value::{Value, ValueKind};
use tracing::{error, instrument, trace};

/// Operators understood by [`builtin_op`].
const OPERATORS: &[&str] = &["+", "-", "*", "/", "%", "^", "min", "max"];

// Helper function, not public
fn extract_number(value: &Value, op: &str, index: usize) -> Result<i64, LispError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => {
            let type_error = LispError::TypeMismatch {
                function: op.to_string(),
                index: index + 1,
                expected: ValueKind::Number,
                got: other.kind(),
            };
            error!(operator = %op, error = %type_error, "Cannot operate on non-number");
            Err(type_error)
        }
    }
}

fn apply(op: &str, lhs: i64, rhs: i64) -> Result<i64, LispError> {
    let overflow = || LispError::Overflow(op.to_string());
    match op {
        "+" => lhs.checked_add(rhs).ok_or_else(overflow),
        "-" => lhs.checked_sub(rhs).ok_or_else(overflow),
        "*" => lhs.checked_mul(rhs).ok_or_else(overflow),
        "/" | "%" if rhs == 0 => {
            error!(operator = %op, dividend = lhs, "Division by zero");
            Err(LispError::DivisionByZero)
        }
        "/" => lhs.checked_div(rhs).ok_or_else(overflow),
        // i64::MIN % -1 is 0; only the matching division overflows.
        "%" => Ok(lhs.wrapping_rem(rhs)),
        "^" => {
            if rhs < 0 {
                return Err(LispError::NegativeExponent(rhs));
            }
            let exponent = u32::try_from(rhs).map_err(|_| overflow())?;
            lhs.checked_pow(exponent).ok_or_else(overflow)
        }
        "min" => Ok(lhs.min(rhs)),
        "max" => Ok(lhs.max(rhs)),
        _ => Err(LispError::UnknownBuiltin(op.to_string())),
    }
}

/// Shared arithmetic reducer: left-folds every argument with `op`, starting from the first.
///
/// All arguments must be Numbers. A lone argument to `-` is negated. A zero divisor
/// ends the fold immediately, so later operands are never consulted.
#[instrument(skip(args), fields(argc = args.len()), ret, err)]
pub fn builtin_op(op: &str, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing arithmetic operator");
    if !OPERATORS.contains(&op) {
        error!(operator = %op, "Unknown arithmetic operator");
        return Err(LispError::UnknownBuiltin(op.to_string()));
    }
    let operands = args
        .iter()
        .enumerate()
        .map(|(i, arg)| extract_number(arg, op, i))
        .collect::<Result<Vec<_>, _>>()?;

    let Some((&first, rest)) = operands.split_first() else {
        error!(operator = %op, "Arithmetic needs at least one operand");
        return Err(LispError::TooFewArguments {
            function: op.to_string(),
            min: 1,
            got: 0,
        });
    };

    if op == "-" && rest.is_empty() {
        return first
            .checked_neg()
            .map(Value::Number)
            .ok_or_else(|| LispError::Overflow(op.to_string()));
    }

    let mut acc = first;
    for &operand in rest {
        acc = apply(op, acc, operand)?;
    }
    Ok(Value::Number(acc))
}

pub fn builtin_add(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("+", args)
}

pub fn builtin_subtract(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("-", args)
}

pub fn builtin_multiply(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("*", args)
}

pub fn builtin_divide(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("/", args)
}

pub fn builtin_remainder(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("%", args)
}

pub fn builtin_power(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("^", args)
}

pub fn builtin_min(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("min", args)
}

pub fn builtin_max(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    builtin_op("max", args)
}
