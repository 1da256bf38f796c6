use std::fmt;

use crate::{
    interpreter::{registry::Function, value::Datum},
    util::num::format_real,
};

/// A 1-based line and column in the equation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// The line, starting at 1.
    pub line:   usize,
    /// The column in characters, starting at 1.
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Represents a literal value written in an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// An integer literal such as `42`.
    Integer(i64),
    /// A real literal such as `1.5` or `2e-3`.
    Real(f64),
    /// A double-quoted string literal.
    Text(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&LiteralValue> for Datum {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Integer(i) => Self::from(*i),
            LiteralValue::Real(r) => Self::from(*r),
            LiteralValue::Text(s) => Self::from(s.as_str()),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => f.write_str(&format_real(*r)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
}

impl BinaryOperator {
    /// The operator as written.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// An unbound syntax tree node, as produced by the parser.
///
/// Names are not yet checked against any catalogue and arguments are not yet
/// checked against any signature; that is the binder's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric or string literal.
    Literal {
        /// The constant value.
        value:    LiteralValue,
        /// Where the literal starts.
        position: Position,
    },
    /// A single-quoted parameter or result name.
    Variable {
        /// The name, without quotes.
        name:     String,
        /// Where the name starts.
        position: Position,
    },
    /// A bare identifier naming a metadata field.
    Property {
        /// The identifier.
        name:     String,
        /// Where the identifier starts.
        position: Position,
    },
    /// A unary operation.
    UnaryOp {
        /// The operator.
        op:       UnaryOperator,
        /// The operand.
        expr:     Box<Self>,
        /// Where the operator was written.
        position: Position,
    },
    /// A binary operation.
    BinaryOp {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Where the operator was written.
        position: Position,
    },
    /// A call of a registered function.
    FunctionCall {
        /// The resolved function.
        function:  Function,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Where the function name starts.
        position:  Position,
    },
}

impl Expr {
    /// Gets the source position of `self`.
    /// ## Example
    /// ```
    /// use derived_metrics::ast::{Expr, Position};
    ///
    /// let expr = Expr::Variable { name:     "PE Count".to_string(),
    ///                             position: Position::new(1, 5), };
    ///
    /// assert_eq!(expr.position(), Position::new(1, 5));
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Literal { position, .. }
            | Self::Variable { position, .. }
            | Self::Property { position, .. }
            | Self::UnaryOp { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::FunctionCall { position, .. } => *position,
        }
    }
}
