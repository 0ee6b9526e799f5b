//! Grammar for the surface syntax, producing a generic parse tree.
//!
//! ```text
//! number  : /-?[0-9]+/ ;
//! symbol  : /[a-zA-Z0-9_+\-*\/\\=<>!&%^]+/ ;
//! sexpr   : '(' <expr>* ')' ;
//! qexpr   : '{' <expr>* '}' ;
//! expr    : <number> | <symbol> | <sexpr> | <qexpr> ;
//! program : /^/ <expr>* /$/ ;
//! ```
//!
//! The tree keeps delimiter tokens and the `^`/`$` anchors as nodes; it is the
//! translator's job to decide what is semantic.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{digit1, multispace0},
    combinator::{all_consuming, cut, opt, recognize},
    error::ErrorKind,
    multi::many0,
    sequence::{pair, preceded},
};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

pub const TAG_ROOT: &str = ">";
pub const TAG_NUMBER: &str = "expr|number|regex";
pub const TAG_SYMBOL: &str = "expr|symbol|regex";
pub const TAG_SEXPR: &str = "expr|sexpr|>";
pub const TAG_QEXPR: &str = "expr|qexpr|>";
pub const TAG_CHAR: &str = "char";
pub const TAG_REGEX: &str = "regex";

const SYMBOL_CHARS: &str = "_+-*/\\=<>!&%^";

/// Deepest group nesting accepted on one line.
pub const MAX_DEPTH: usize = 128;

/// A node of the generic parse tree: a `|`-separated tag, the matched text for
/// leaves, and ordered children for branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<ParseNode>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("<stdin>:1:{column}: error: unexpected input '{snippet}'")]
    UnexpectedInput { column: usize, snippet: String },
    #[error("<stdin>:1:{column}: error: unexpected end of input")]
    UnexpectedEnd { column: usize },
    #[error("<stdin>:1:{column}: error: groups nested deeper than {MAX_DEPTH} levels")]
    TooDeep { column: usize },
    #[error("<stdin>: error: incomplete input")]
    Incomplete,
}

impl ParseNode {
    fn leaf(tag: &str, contents: &str) -> Self {
        ParseNode {
            tag: tag.to_string(),
            contents: contents.to_string(),
            children: Vec::new(),
        }
    }

    fn branch(tag: &str, children: Vec<ParseNode>) -> Self {
        ParseNode {
            tag: tag.to_string(),
            contents: String::new(),
            children,
        }
    }

    /// True when `segment` is one of the `|`-separated parts of this node's tag.
    pub fn has_tag(&self, segment: &str) -> bool {
        self.tag.split('|').any(|part| part == segment)
    }

    pub fn num_leaves(&self) -> usize {
        if self.children.is_empty() {
            return 1;
        }
        self.children.iter().map(ParseNode::num_leaves).sum()
    }

    pub fn num_branches(&self) -> usize {
        if self.children.is_empty() {
            return 0;
        }
        1 + self.children.iter().map(ParseNode::num_branches).sum::<usize>()
    }

    /// The largest child count of any node in the tree.
    pub fn most_children(&self) -> usize {
        self.children
            .iter()
            .map(ParseNode::most_children)
            .fold(self.children.len(), usize::max)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.tag, indent = depth * 2)?;
        if !self.contents.is_empty() {
            write!(f, " '{}'", self.contents)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_number(input: &str) -> IResult<&str, ParseNode> {
    trace!("Attempting to parse number token");
    recognize(pair(opt(tag("-")), digit1))
        .map(|text: &str| ParseNode::leaf(TAG_NUMBER, text))
        .parse(input)
}

#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_symbol(input: &str) -> IResult<&str, ParseNode> {
    trace!("Attempting to parse symbol token");
    take_while1(|c: char| c.is_ascii_alphanumeric() || SYMBOL_CHARS.contains(c))
        .map(|text: &str| ParseNode::leaf(TAG_SYMBOL, text))
        .parse(input)
}

fn group_node(tag_name: &str, open: &str, exprs: Vec<ParseNode>, close: &str) -> ParseNode {
    let mut children = Vec::with_capacity(exprs.len() + 2);
    children.push(ParseNode::leaf(TAG_CHAR, open));
    children.extend(exprs);
    children.push(ParseNode::leaf(TAG_CHAR, close));
    ParseNode::branch(tag_name, children)
}

/// A bracketed form of the grammar.
struct Group {
    tag: &'static str,
    open: &'static str,
    close: &'static str,
}

const SEXPR_GROUP: Group = Group {
    tag: TAG_SEXPR,
    open: "(",
    close: ")",
};

const QEXPR_GROUP: Group = Group {
    tag: TAG_QEXPR,
    open: "{",
    close: "}",
};

/// Parses one group whose opening delimiter sits at nesting level `depth`.
///
/// Once the opening delimiter matched, failures inside the group are not
/// backtracked, so errors point at the offending position rather than the group start.
#[tracing::instrument(level = "trace", skip(input, group), fields(open = group.open))]
fn parse_group<'a>(input: &'a str, depth: usize, group: &Group) -> IResult<&'a str, ParseNode> {
    let (rest, open) = tag(group.open).parse(input)?;
    if depth >= MAX_DEPTH {
        debug!(depth, "Nesting limit reached");
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    let (rest, (exprs, close)) = cut(pair(
        many0(preceded(multispace0, |i| parse_expr(i, depth + 1))),
        preceded(multispace0, tag(group.close)),
    ))
    .parse(rest)?;
    Ok((rest, group_node(group.tag, open, exprs, close)))
}

// Numbers are tried before symbols since the symbol alphabet includes digits.
fn parse_expr(input: &str, depth: usize) -> IResult<&str, ParseNode> {
    alt((
        parse_number,
        parse_symbol,
        |i| parse_group(i, depth, &SEXPR_GROUP),
        |i| parse_group(i, depth, &QEXPR_GROUP),
    ))
    .parse(input)
}

/// Parses a whole input line into a tree rooted at a `>` node.
///
/// Groups may nest at most [`MAX_DEPTH`] levels deep.
#[tracing::instrument(level = "debug", skip(input), fields(input = %input))]
pub fn parse_program(input: &str) -> Result<ParseNode, ParseError> {
    let result = all_consuming((
        many0(preceded(multispace0, |i| parse_expr(i, 0))),
        multispace0,
    ))
    .map(|(exprs, _)| {
        let mut children = Vec::with_capacity(exprs.len() + 2);
        children.push(ParseNode::leaf(TAG_REGEX, ""));
        children.extend(exprs);
        children.push(ParseNode::leaf(TAG_REGEX, ""));
        ParseNode::branch(TAG_ROOT, children)
    })
    .parse(input);

    match result {
        Ok((_, tree)) => {
            debug!(leaves = tree.num_leaves(), "Parsed program");
            Ok(tree)
        }
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            let offset = input.len() - e.input.len();
            let column = input[..offset].chars().count() + 1;
            debug!(column, code = ?e.code, "Failed to parse program");
            if e.code == ErrorKind::TooLarge {
                return Err(ParseError::TooDeep { column });
            }
            if e.input.is_empty() {
                return Err(ParseError::UnexpectedEnd { column });
            }
            let snippet: String = e.input.chars().take(16).collect();
            Err(ParseError::UnexpectedInput { column, snippet })
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Incomplete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn exprs(tree: &ParseNode) -> Vec<&ParseNode> {
        tree.children
            .iter()
            .filter(|child| child.tag != TAG_REGEX && child.tag != TAG_CHAR)
            .collect()
    }

    #[test]
    fn test_parse_number() {
        init_test_logging();
        let tree = parse_program("123").unwrap();
        assert_eq!(tree.tag, TAG_ROOT);
        assert_eq!(exprs(&tree), vec![&ParseNode::leaf(TAG_NUMBER, "123")]);
    }

    #[test]
    fn test_parse_negative_number() {
        init_test_logging();
        let tree = parse_program("  -10 ").unwrap();
        assert_eq!(exprs(&tree), vec![&ParseNode::leaf(TAG_NUMBER, "-10")]);
    }

    #[test]
    fn test_parse_operator_symbols() {
        init_test_logging();
        for op in ["+", "-", "*", "/", "%", "^", "min", "max", "list", "a-b", "x1"] {
            let tree = parse_program(op).unwrap();
            assert_eq!(exprs(&tree), vec![&ParseNode::leaf(TAG_SYMBOL, op)], "{op}");
        }
    }

    #[test]
    fn test_parse_sexpr_keeps_delimiters() {
        init_test_logging();
        let tree = parse_program("(+ 1 2)").unwrap();
        let sexpr = exprs(&tree)[0];
        assert!(sexpr.has_tag("sexpr"));
        assert_eq!(sexpr.children.len(), 5);
        assert_eq!(sexpr.children[0], ParseNode::leaf(TAG_CHAR, "("));
        assert_eq!(sexpr.children[4], ParseNode::leaf(TAG_CHAR, ")"));
    }

    #[test]
    fn test_parse_nested_groups() {
        init_test_logging();
        let tree = parse_program("head { (1) {} 2 }").unwrap();
        let top = exprs(&tree);
        assert_eq!(top.len(), 2);
        assert!(top[1].has_tag("qexpr"));
        assert_eq!(exprs(top[1]).len(), 3);
    }

    #[test]
    fn test_parse_empty_input() {
        init_test_logging();
        let tree = parse_program("   ").unwrap();
        assert!(exprs(&tree).is_empty());
    }

    #[test]
    fn test_parse_unclosed_group_fails() {
        init_test_logging();
        assert_eq!(
            parse_program("+ 1 (2 3"),
            Err(ParseError::UnexpectedEnd { column: 9 })
        );
    }

    #[test]
    fn test_parse_error_points_inside_group() {
        init_test_logging();
        assert_eq!(
            parse_program("(+ 1"),
            Err(ParseError::UnexpectedEnd { column: 5 })
        );
        assert_eq!(
            parse_program("{1 (2 $) 3}"),
            Err(ParseError::UnexpectedInput {
                column: 7,
                snippet: "$) 3}".to_string()
            })
        );
    }

    #[test]
    fn test_parse_nesting_limit() {
        init_test_logging();
        let at_limit = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_program(&at_limit).is_ok());

        let over_limit = format!("{}1{}", "{".repeat(MAX_DEPTH + 1), "}".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse_program(&over_limit),
            Err(ParseError::TooDeep {
                column: MAX_DEPTH + 1
            })
        );
    }

    #[test]
    fn test_parse_very_deep_input_is_rejected() {
        init_test_logging();
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(parse_program(&deep), Err(ParseError::TooDeep { column: 129 }));
    }

    #[test]
    fn test_parse_unexpected_character_fails() {
        init_test_logging();
        let err = parse_program("1 $").unwrap_err();
        assert_eq!(err.to_string(), "<stdin>:1:3: error: unexpected input '$'");
    }

    #[test]
    fn test_tree_statistics() {
        init_test_logging();
        // > [regex, +, 1, (sexpr: '(' * 2 3 ')'), regex]
        let tree = parse_program("+ 1 (* 2 3)").unwrap();
        assert_eq!(tree.num_leaves(), 9);
        assert_eq!(tree.num_branches(), 2);
        assert_eq!(tree.most_children(), 5);
    }

    #[test]
    fn test_tree_display_is_indented() {
        init_test_logging();
        let rendered = parse_program("{1}").unwrap().to_string();
        assert_eq!(
            rendered,
            ">\n  regex\n  expr|qexpr|>\n    char '{'\n    expr|number|regex '1'\n    char '}'\n  regex\n"
        );
    }
}
