use crate::engine::builtins::Builtin;
use crate::engine::eval::LispError;
use std::fmt;

/// A single value of the language.
///
/// Sequence variants exclusively own their children, so a `Value` is always a tree.
/// Copying a value (`Clone`) is a full, independent deep copy; `Function` only copies
/// the tag of the native operation it refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(i64),
    Error(String),
    Symbol(String),
    Function(Builtin),
    /// Executable form: evaluating it reduces every child and applies the first.
    SExpr(Vec<Value>),
    /// Literal list data; never evaluated automatically.
    QExpr(Vec<Value>),
}

/// Type tag of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Error,
    Symbol,
    Function,
    SExpr,
    QExpr,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ValueKind::Number => "Number",
            ValueKind::Error => "Error",
            ValueKind::Symbol => "Symbol",
            ValueKind::Function => "Function",
            ValueKind::SExpr => "S-Expression",
            ValueKind::QExpr => "Q-Expression",
        };
        f.write_str(description)
    }
}

impl Value {
    pub fn number(n: i64) -> Self {
        Value::Number(n)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(message.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn function(builtin: Builtin) -> Self {
        Value::Function(builtin)
    }

    /// An empty S-Expression, also used as the unit result.
    pub fn sexpr() -> Self {
        Value::SExpr(Vec::new())
    }

    pub fn qexpr() -> Self {
        Value::QExpr(Vec::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Error(_) => ValueKind::Error,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Function(_) => ValueKind::Function,
            Value::SExpr(_) => ValueKind::SExpr,
            Value::QExpr(_) => ValueKind::QExpr,
        }
    }

    /// Children of a sequence value, or `None` for atoms.
    pub fn cells(&self) -> Option<&[Value]> {
        match self {
            Value::SExpr(cells) | Value::QExpr(cells) => Some(cells),
            _ => None,
        }
    }

    fn cells_mut(&mut self) -> Result<&mut Vec<Value>, LispError> {
        match self {
            Value::SExpr(cells) | Value::QExpr(cells) => Ok(cells),
            other => Err(LispError::NotASequence(other.kind())),
        }
    }

    /// Number of children of a sequence value; atoms count as zero.
    pub fn len(&self) -> usize {
        self.cells().map_or(0, <[Value]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves `child` to the end of this sequence.
    pub fn append(&mut self, child: Value) -> Result<(), LispError> {
        self.cells_mut()?.push(child);
        Ok(())
    }

    /// Removes the child at `index`, shifting the rest down, and hands it to the caller.
    pub fn pop(&mut self, index: usize) -> Result<Value, LispError> {
        let cells = self.cells_mut()?;
        if index >= cells.len() {
            return Err(LispError::IndexOutOfRange {
                index,
                len: cells.len(),
            });
        }
        let child = cells.remove(index);
        cells.shrink_to_fit();
        Ok(child)
    }

    /// Extracts the child at `index` and drops whatever remains of this sequence.
    pub fn take(mut self, index: usize) -> Result<Value, LispError> {
        self.pop(index)
    }

    /// Moves every child of `other` onto the end of `self`, in order.
    pub fn join(mut self, other: Value) -> Result<Value, LispError> {
        let kind = other.kind();
        let moved = match other {
            Value::SExpr(cells) | Value::QExpr(cells) => cells,
            _ => return Err(LispError::NotASequence(kind)),
        };
        self.cells_mut()?.extend(moved);
        Ok(self)
    }

    /// Reinterprets an S-Expression as literal data (tag change only).
    pub fn into_qexpr(self) -> Value {
        match self {
            Value::SExpr(cells) => Value::QExpr(cells),
            other => other,
        }
    }

    /// Reinterprets a Q-Expression as an executable form (tag change only).
    pub fn into_sexpr(self) -> Value {
        match self {
            Value::QExpr(cells) => Value::SExpr(cells),
            other => other,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl From<LispError> for Value {
    fn from(err: LispError) -> Self {
        Value::Error(err.to_string())
    }
}

fn fmt_cells(f: &mut fmt::Formatter<'_>, cells: &[Value], open: char, close: char) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", cell)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Error(message) => write!(f, "Error: {}", message),
            Value::Symbol(name) => f.write_str(name),
            Value::Function(_) => f.write_str("<function>"),
            Value::SExpr(cells) => fmt_cells(f, cells, '(', ')'),
            Value::QExpr(cells) => fmt_cells(f, cells, '{', '}'),
        }
    }
}
