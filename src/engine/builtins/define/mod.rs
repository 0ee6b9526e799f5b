use crate::engine::builtins::{expect_kind, expect_min_arity, expect_not_empty};
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::value::{Value, ValueKind};
use tracing::{debug, error, instrument, trace};

/// `def {a b ...} va vb ...`: binds each symbol to the value in the same position.
///
/// The symbol list and the value count are validated before anything is bound, so a
/// rejected definition leaves the environment untouched.
#[instrument(skip_all, fields(argc = args.len()), ret, err)]
pub fn builtin_def(env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'def'");
    expect_min_arity("def", &args, 1)?;
    expect_kind("def", &args, 0, ValueKind::QExpr)?;
    expect_not_empty("def", &args, 0)?;

    let mut args = args.into_iter();
    let targets = match args.next() {
        Some(Value::QExpr(cells)) => cells,
        _ => Vec::new(),
    };
    let values: Vec<Value> = args.collect();

    let mut names = Vec::with_capacity(targets.len());
    for (index, target) in targets.into_iter().enumerate() {
        match target {
            Value::Symbol(name) => names.push(name),
            other => {
                error!(found = %other, "Cannot define non-symbol");
                return Err(LispError::NonSymbolBinding {
                    index: index + 1,
                    got: other.kind(),
                });
            }
        }
    }

    if names.len() != values.len() {
        error!(
            symbols = names.len(),
            values = values.len(),
            "Symbol and value counts differ"
        );
        return Err(LispError::BindingCountMismatch {
            symbols: names.len(),
            values: values.len(),
        });
    }

    for (name, value) in names.iter().zip(&values) {
        env.put(name, value);
        debug!(name = %name, value = %value, "Defined symbol");
    }
    Ok(Value::sexpr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate_line;
    use crate::logging::init_test_logging;

    fn run(env: &mut Environment, code: &str) -> Value {
        evaluate_line(code, env).expect("test input should parse")
    }

    #[test]
    fn def_binds_pairwise() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        assert_eq!(run(&mut env, "def {x y} 1 2"), Value::sexpr());
        assert_eq!(run(&mut env, "x"), Value::Number(1));
        assert_eq!(run(&mut env, "y"), Value::Number(2));
        assert_eq!(run(&mut env, "+ x y"), Value::Number(3));
    }

    #[test]
    fn redefinition_does_not_affect_earlier_copies() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        run(&mut env, "def {x} 1");
        let earlier = run(&mut env, "x");
        run(&mut env, "def {x} 99");
        assert_eq!(run(&mut env, "x"), Value::Number(99));
        assert_eq!(earlier, Value::Number(1));
    }

    #[test]
    fn stored_list_is_isolated_from_evaluated_copies() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        run(&mut env, "def {l} {1 2 3}");
        assert_eq!(run(&mut env, "tail l").to_string(), "{2 3}");
        assert_eq!(run(&mut env, "def {m} (tail l)"), Value::sexpr());
        assert_eq!(run(&mut env, "l").to_string(), "{1 2 3}");
        assert_eq!(run(&mut env, "m").to_string(), "{2 3}");
    }

    #[test]
    fn def_can_bind_through_an_evaluated_symbol_list() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        run(&mut env, "def {names} {a b}");
        run(&mut env, "def names 10 20");
        assert_eq!(run(&mut env, "a"), Value::Number(10));
        assert_eq!(run(&mut env, "b"), Value::Number(20));
    }

    #[test]
    fn def_can_shadow_builtins() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        run(&mut env, "def {head} tail");
        assert_eq!(run(&mut env, "head {1 2}").to_string(), "{2}");
    }

    #[test]
    fn def_rejects_non_symbols() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        assert_eq!(
            run(&mut env, "def {x 1} 1 2"),
            Value::from(LispError::NonSymbolBinding {
                index: 2,
                got: ValueKind::Number,
            })
        );
        assert!(run(&mut env, "x").is_error());
    }

    #[test]
    fn def_rejects_count_mismatch() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        assert_eq!(
            run(&mut env, "def {x y} 1"),
            Value::from(LispError::BindingCountMismatch {
                symbols: 2,
                values: 1,
            })
        );
        assert!(run(&mut env, "x").is_error());
    }

    #[test]
    fn def_rejects_empty_or_non_list_targets() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        assert!(run(&mut env, "def {}").is_error());
        assert!(run(&mut env, "def 1 2").is_error());
    }

    #[test]
    fn undefined_symbol_does_not_end_the_session() {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        assert_eq!(run(&mut env, "z"), Value::error("Unbound symbol 'z'"));
        assert_eq!(run(&mut env, "def {z} 5"), Value::sexpr());
        assert_eq!(run(&mut env, "z"), Value::Number(5));
    }
}
