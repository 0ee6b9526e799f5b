use crate::engine::eval::LispError;
use crate::engine::parser::{ParseNode, TAG_REGEX};
use crate::engine::value::Value;
use tracing::{trace, warn};

/// Delimiter tokens and anchor placeholders carry no meaning of their own.
fn is_semantic(node: &ParseNode) -> bool {
    !matches!(node.contents.as_str(), "(" | ")" | "{" | "}") && node.tag != TAG_REGEX
}

/// Converts a parse tree into a value tree.
///
/// Number leaves that do not fit an `i64` become Error values rather than failing the
/// whole translation. The root and every parenthesized group become S-Expressions.
pub fn translate(node: &ParseNode) -> Value {
    if node.has_tag("number") {
        return match node.contents.parse::<i64>() {
            Ok(n) => Value::Number(n),
            Err(_) => {
                warn!(text = %node.contents, "Number literal does not fit in an integer");
                Value::from(LispError::InvalidNumber(node.contents.clone()))
            }
        };
    }

    if node.has_tag("symbol") {
        return Value::Symbol(node.contents.clone());
    }

    let mut sequence = if node.has_tag("qexpr") {
        Value::qexpr()
    } else {
        Value::sexpr()
    };
    for child in node.children.iter().filter(|child| is_semantic(child)) {
        if let Err(err) = sequence.append(translate(child)) {
            return Value::from(err);
        }
    }
    trace!(tag = %node.tag, kind = %sequence.kind(), "Translated sequence");
    sequence
}
