pub mod define;
pub mod globals;
pub mod list;
pub mod math;

use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::value::{Value, ValueKind};
use tracing::error;

/// Calling convention shared by every builtin: the environment and the owned,
/// already-evaluated argument sequence. The function consumes the arguments.
pub type BuiltinFn = fn(&mut Environment, Vec<Value>) -> Result<Value, LispError>;

/// The closed set of native operations a `Function` value can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
    Min,
    Max,
    List,
    Head,
    Tail,
    Eval,
    Join,
    Cons,
    Len,
    Init,
    Def,
}

impl Builtin {
    /// Every builtin, in the order they are installed into a fresh environment.
    pub const ALL: &'static [Builtin] = &[
        Builtin::Add,
        Builtin::Subtract,
        Builtin::Multiply,
        Builtin::Divide,
        Builtin::Remainder,
        Builtin::Power,
        Builtin::Min,
        Builtin::Max,
        Builtin::List,
        Builtin::Head,
        Builtin::Tail,
        Builtin::Eval,
        Builtin::Join,
        Builtin::Cons,
        Builtin::Len,
        Builtin::Init,
        Builtin::Def,
    ];

    /// The symbol this builtin is bound to.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Subtract => "-",
            Builtin::Multiply => "*",
            Builtin::Divide => "/",
            Builtin::Remainder => "%",
            Builtin::Power => "^",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::List => "list",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Eval => "eval",
            Builtin::Join => "join",
            Builtin::Cons => "cons",
            Builtin::Len => "len",
            Builtin::Init => "init",
            Builtin::Def => "def",
        }
    }

    fn func(self) -> BuiltinFn {
        match self {
            Builtin::Add => math::builtin_add,
            Builtin::Subtract => math::builtin_subtract,
            Builtin::Multiply => math::builtin_multiply,
            Builtin::Divide => math::builtin_divide,
            Builtin::Remainder => math::builtin_remainder,
            Builtin::Power => math::builtin_power,
            Builtin::Min => math::builtin_min,
            Builtin::Max => math::builtin_max,
            Builtin::List => list::builtin_list,
            Builtin::Head => list::builtin_head,
            Builtin::Tail => list::builtin_tail,
            Builtin::Eval => list::builtin_eval,
            Builtin::Join => list::builtin_join,
            Builtin::Cons => list::builtin_cons,
            Builtin::Len => list::builtin_len,
            Builtin::Init => list::builtin_init,
            Builtin::Def => define::builtin_def,
        }
    }

    pub fn call(self, env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
        (self.func())(env, args)
    }
}

fn fail(err: LispError) -> Result<(), LispError> {
    error!(error = %err, "Builtin rejected its arguments");
    Err(err)
}

/// Requires exactly `expected` arguments.
pub(crate) fn expect_arity(function: &str, args: &[Value], expected: usize) -> Result<(), LispError> {
    if args.len() != expected {
        return fail(LispError::ArityMismatch {
            function: function.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Requires at least `min` arguments.
pub(crate) fn expect_min_arity(function: &str, args: &[Value], min: usize) -> Result<(), LispError> {
    if args.len() < min {
        return fail(LispError::TooFewArguments {
            function: function.to_string(),
            min,
            got: args.len(),
        });
    }
    Ok(())
}

/// Requires the argument at `index` to be of kind `expected`. Positions in messages are 1-based.
pub(crate) fn expect_kind(
    function: &str,
    args: &[Value],
    index: usize,
    expected: ValueKind,
) -> Result<(), LispError> {
    let got = args[index].kind();
    if got != expected {
        return fail(LispError::TypeMismatch {
            function: function.to_string(),
            index: index + 1,
            expected,
            got,
        });
    }
    Ok(())
}

/// Requires the sequence argument at `index` to have at least one child.
pub(crate) fn expect_not_empty(function: &str, args: &[Value], index: usize) -> Result<(), LispError> {
    if args[index].is_empty() {
        return fail(LispError::EmptyList {
            function: function.to_string(),
            index: index + 1,
        });
    }
    Ok(())
}
