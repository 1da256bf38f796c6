use std::fmt;

use crate::interpreter::{
    catalogue::VariableClass,
    registry::{Function, Returns},
    value::{Datum, KindSet, ValueKind},
};

/// A literal constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    /// The literal value.
    pub datum: Datum,
}

/// A reference to a parameter or result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    /// The variable name, which is also its column name.
    pub name:  String,
    /// Parameter or result.
    pub class: VariableClass,
    /// The kind its cells hold.
    pub kind:  ValueKind,
}

/// A reference to a metadata column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    /// The identifier as written in the equation.
    pub identifier: String,
    /// The grid column it resolves to.
    pub column:     String,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `-x`
    Negate,
    /// `x+y`
    Add,
    /// `x-y`
    Sub,
    /// `x*y`
    Mul,
    /// `x/y`
    Div,
}

impl Operator {
    /// The operator as written, also used as its name in errors.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Negate | Self::Sub => "-",
            Self::Add => "+",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Number of operands.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Negate => 1,
            Self::Add | Self::Sub | Self::Mul | Self::Div => 2,
        }
    }
}

/// A bound operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorNode {
    /// The operator.
    pub operator: Operator,
    /// One operand for negation, two otherwise.
    pub operands: Vec<Node>,
}

/// A bound function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    /// The function.
    pub function:  Function,
    /// Arguments, validated against the function's signature.
    pub arguments: Vec<Node>,
}

/// A node of a bound equation.
///
/// Bound trees are produced only by the binder, so every operator and
/// function node already has the right number of arguments of acceptable
/// kinds and shapes. A tree never changes once bound and can be evaluated
/// against any number of grids.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal.
    Constant(Constant),
    /// A quoted parameter or result name.
    Variable(VariableRef),
    /// A bare metadata identifier.
    Property(PropertyRef),
    /// An arithmetic operation.
    Operator(OperatorNode),
    /// A function call.
    Function(FunctionNode),
}

impl Node {
    /// The kinds this node's cells may hold.
    #[must_use]
    pub fn return_kinds(&self) -> KindSet {
        match self {
            Self::Constant(c) => KindSet::of(c.datum.kind()),
            Self::Variable(v) => KindSet::of(v.kind),
            Self::Property(_) => KindSet::TEXT,
            Self::Operator(_) => KindSet::REAL,
            Self::Function(f) => match f.function.signature().returns {
                Returns::Fixed(kinds) => kinds,
                Returns::Arguments => f.arguments
                                       .iter()
                                       .fold(KindSet::EMPTY, |acc, arg| acc.union(arg.return_kinds())),
            },
        }
    }

    /// The name of the column this node produces or reads.
    ///
    /// Derived from the node's shape alone, so structurally identical nodes
    /// always share a name. Operands that are themselves operations are
    /// parenthesised, which keeps `(a+b)*c` and `a+b*c` apart.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::{
    ///     node::{Constant, FunctionNode, Node},
    ///     registry::Function,
    ///     value::Datum,
    /// };
    ///
    /// let node = Node::Function(FunctionNode { function:  Function::Abs,
    ///                                          arguments: vec![Node::Constant(Constant {
    ///                                              datum: Datum::from(2_i64),
    ///                                          })], });
    ///
    /// assert_eq!(node.column_name(), "abs(2)");
    /// ```
    #[must_use]
    pub fn column_name(&self) -> String {
        match self {
            Self::Constant(c) => c.datum.column_name(),
            Self::Variable(v) => v.name.clone(),
            Self::Property(p) => p.column.clone(),
            Self::Operator(o) => {
                if let [operand] = o.operands.as_slice() {
                    return format!("{}{}", o.operator.symbol(), operand.negated_name());
                }
                let operands: Vec<String> = o.operands.iter().map(Self::operand_name).collect();
                operands.join(o.operator.symbol())
            },
            Self::Function(f) => {
                let arguments: Vec<String> = f.arguments.iter().map(Self::column_name).collect();
                format!("{}({})", f.function.name(), arguments.join(", "))
            },
        }
    }

    fn operand_name(&self) -> String {
        match self {
            Self::Operator(_) => format!("({})", self.column_name()),
            _ => self.column_name(),
        }
    }

    /// Negated constants are parenthesised so `-(5)` never shares a name
    /// with the literal `-5`.
    fn negated_name(&self) -> String {
        match self {
            Self::Operator(_) | Self::Constant(_) => format!("({})", self.column_name()),
            _ => self.column_name(),
        }
    }

    /// The child nodes, in argument order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Constant(_) | Self::Variable(_) | Self::Property(_) => &[],
            Self::Operator(o) => &o.operands,
            Self::Function(f) => &f.arguments,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}
