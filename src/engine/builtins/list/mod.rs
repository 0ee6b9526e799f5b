use crate::engine::builtins::{expect_arity, expect_kind, expect_min_arity, expect_not_empty};
use crate::engine::env::Environment;
use crate::engine::eval::{eval, LispError};
use crate::engine::value::{Value, ValueKind};
use tracing::{instrument, trace};

/// Checks for a single Q-Expression argument, non-empty unless `allow_empty`, and hands it back.
fn single_list(function: &str, args: Vec<Value>, allow_empty: bool) -> Result<Value, LispError> {
    expect_arity(function, &args, 1)?;
    expect_kind(function, &args, 0, ValueKind::QExpr)?;
    if !allow_empty {
        expect_not_empty(function, &args, 0)?;
    }
    Value::SExpr(args).take(0)
}

/// `list`: the evaluated arguments become literal data.
#[instrument(skip_all, fields(argc = args.len()), ret)]
pub fn builtin_list(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'list'");
    Ok(Value::SExpr(args).into_qexpr())
}

#[instrument(skip_all, ret, err)]
pub fn builtin_head(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'head'");
    let list = single_list("head", args, false)?;
    Ok(Value::QExpr(vec![list.take(0)?]))
}

#[instrument(skip_all, ret, err)]
pub fn builtin_tail(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'tail'");
    let mut list = single_list("tail", args, false)?;
    list.pop(0)?;
    Ok(list)
}

#[instrument(skip_all, ret, err)]
pub fn builtin_init(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'init'");
    let mut list = single_list("init", args, false)?;
    let last = list.len() - 1;
    list.pop(last)?;
    Ok(list)
}

#[instrument(skip_all, ret, err)]
pub fn builtin_len(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'len'");
    let list = single_list("len", args, true)?;
    let count = i64::try_from(list.len()).map_err(|_| LispError::Overflow("len".to_string()))?;
    Ok(Value::Number(count))
}

/// `eval`: turns quoted data back into an executable form and evaluates it.
#[instrument(skip_all, ret, err)]
pub fn builtin_eval(env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'eval'");
    let expr = single_list("eval", args, true)?.into_sexpr();
    Ok(eval(env, expr))
}

#[instrument(skip_all, fields(argc = args.len()), ret, err)]
pub fn builtin_join(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'join'");
    expect_min_arity("join", &args, 1)?;
    for index in 0..args.len() {
        expect_kind("join", &args, index, ValueKind::QExpr)?;
    }

    let mut lists = args.into_iter();
    let first = lists.next().unwrap_or_else(Value::qexpr);
    lists.try_fold(first, Value::join)
}

#[instrument(skip_all, ret, err)]
pub fn builtin_cons(_env: &mut Environment, args: Vec<Value>) -> Result<Value, LispError> {
    trace!("Executing builtin 'cons'");
    expect_arity("cons", &args, 2)?;
    expect_kind("cons", &args, 1, ValueKind::QExpr)?;

    let mut args = Value::SExpr(args);
    let element = args.pop(0)?;
    let list = args.take(0)?;
    Value::QExpr(vec![element]).join(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate_line;
    use crate::logging::init_test_logging;

    // Helper to evaluate a line in a fresh environment with every builtin installed.
    fn eval_list_str(code: &str) -> Value {
        init_test_logging();
        let mut env = Environment::new_with_prelude();
        evaluate_line(code, &mut env).expect("test input should parse")
    }

    fn render(code: &str) -> String {
        eval_list_str(code).to_string()
    }

    #[test]
    fn list_quotes_evaluated_arguments() {
        assert_eq!(render("list 1 2 3"), "{1 2 3}");
        assert_eq!(render("list (+ 1 1) {x}"), "{2 {x}}");
    }

    #[test]
    fn head_keeps_first_element() {
        assert_eq!(render("head {1 2 3}"), "{1}");
        assert_eq!(render("head {{a b} c}"), "{{a b}}");
    }

    #[test]
    fn head_of_empty_list_is_an_error() {
        assert_eq!(
            eval_list_str("head {}"),
            Value::from(LispError::EmptyList {
                function: "head".to_string(),
                index: 1,
            })
        );
    }

    #[test]
    fn head_of_number_is_a_type_error() {
        assert_eq!(
            eval_list_str("head 5"),
            Value::from(LispError::TypeMismatch {
                function: "head".to_string(),
                index: 1,
                expected: ValueKind::QExpr,
                got: ValueKind::Number,
            })
        );
    }

    #[test]
    fn head_arity_error() {
        assert_eq!(
            render("head {1} {2}"),
            "Error: Wrong number of arguments for function 'head' (2 for 1)"
        );
    }

    #[test]
    fn tail_drops_first_element() {
        assert_eq!(render("tail {1 2 3}"), "{2 3}");
        assert_eq!(render("tail {1}"), "{}");
        assert!(eval_list_str("tail {}").is_error());
    }

    #[test]
    fn init_drops_last_element() {
        assert_eq!(render("init {1 2 3}"), "{1 2}");
        assert!(eval_list_str("init {}").is_error());
    }

    #[test]
    fn len_counts_elements() {
        assert_eq!(eval_list_str("len {1 2 3}"), Value::Number(3));
        assert_eq!(eval_list_str("len {}"), Value::Number(0));
        assert!(eval_list_str("len 3").is_error());
    }

    #[test]
    fn eval_executes_quoted_code() {
        assert_eq!(eval_list_str("eval {+ 1 2}"), Value::Number(3));
        assert_eq!(render("eval (tail {tail tail {5 6 7}})"), "{6 7}");
        assert_eq!(render("eval {}"), "()");
    }

    #[test]
    fn eval_requires_qexpr() {
        assert!(eval_list_str("eval 1").is_error());
    }

    #[test]
    fn join_concatenates_in_order() {
        assert_eq!(render("join {1 2} {3} {4 5}"), "{1 2 3 4 5}");
        assert_eq!(render("join {1 2 3}"), "{1 2 3}");
        assert_eq!(render("join {} {}"), "{}");
    }

    #[test]
    fn join_rejects_non_qexpr() {
        assert_eq!(
            eval_list_str("join {1} 2"),
            Value::from(LispError::TypeMismatch {
                function: "join".to_string(),
                index: 2,
                expected: ValueKind::QExpr,
                got: ValueKind::Number,
            })
        );
    }

    #[test]
    fn cons_prepends() {
        assert_eq!(render("cons 1 {2 3}"), "{1 2 3}");
        assert_eq!(render("cons {1} {}"), "{{1}}");
        assert!(eval_list_str("cons 1 2").is_error());
        assert!(eval_list_str("cons {1}").is_error());
    }
}
