use tracing::{instrument, trace};

use crate::{
    ast::{BinaryOperator, Expr, Position, UnaryOperator},
    error::BindError,
    interpreter::{
        catalogue::Catalogue,
        node::{Constant, FunctionNode, Node, Operator, OperatorNode, PropertyRef, VariableRef},
        registry::{Function, Shape},
        value::{Datum, KindSet},
    },
};

pub type BindResult<T> = Result<T, BindError>;

/// Turns parsed expressions into bound trees.
///
/// Binding resolves every name against the catalogue and checks every
/// operator and function call against its signature. It never looks at data,
/// so an equation is bound once no matter how many grids it is applied to.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'c> {
    catalogue: &'c Catalogue,
}

impl<'c> Binder<'c> {
    /// Creates a binder resolving names against `catalogue`.
    #[must_use]
    pub const fn new(catalogue: &'c Catalogue) -> Self {
        Self { catalogue }
    }

    /// Binds `expr` and all of its sub-expressions, children first.
    ///
    /// # Errors
    /// - `UnknownVariable` / `UnknownProperty` for names missing from the
    ///   catalogue.
    /// - `ArgumentCountMismatch` when a call has the wrong number of
    ///   arguments.
    /// - `ArgumentTypeMismatch` when an argument may return a kind its slot
    ///   does not accept.
    /// - `ArgumentShapeMismatch` when an argument is not the kind of node its
    ///   slot requires.
    /// - `IncomparableArguments` when arguments that are compared share no
    ///   comparable kind.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::{
    ///     error::BindError,
    ///     interpreter::{
    ///         binder::Binder,
    ///         catalogue::{Catalogue, VariableClass},
    ///         lexer::tokenize,
    ///         parser::core::parse_equation,
    ///         value::ValueKind,
    ///     },
    /// };
    ///
    /// let catalogue = Catalogue::with_metadata_fields().with_variable("Time",
    ///                                                                 VariableClass::Result,
    ///                                                                 ValueKind::Real);
    /// let binder = Binder::new(&catalogue);
    ///
    /// let good = parse_equation(&tokenize("avg('Time') * 2").unwrap()).unwrap();
    /// assert_eq!(binder.bind(&good).unwrap().column_name(), "avg(Time)*2");
    ///
    /// let bad = parse_equation(&tokenize("avg(Machine)").unwrap()).unwrap();
    /// assert!(matches!(binder.bind(&bad), Err(BindError::ArgumentTypeMismatch { .. })));
    /// ```
    #[instrument(name = "engine::binder::bind", level = "trace", skip(self, expr))]
    pub fn bind(&self, expr: &Expr) -> BindResult<Node> {
        match expr {
            Expr::Literal { value, .. } => Ok(Node::Constant(Constant { datum: Datum::from(value) })),
            Expr::Variable { name, position } => self.bind_variable(name, *position),
            Expr::Property { name, position } => self.bind_property(name, *position),
            Expr::UnaryOp { op, expr, position } => {
                let operator = match op {
                    UnaryOperator::Negate => Operator::Negate,
                };
                let operands = vec![self.bind(expr)?];
                Self::bind_operator(operator, operands, *position)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             position, } => {
                let operator = match op {
                    BinaryOperator::Add => Operator::Add,
                    BinaryOperator::Sub => Operator::Sub,
                    BinaryOperator::Mul => Operator::Mul,
                    BinaryOperator::Div => Operator::Div,
                };
                let operands = vec![self.bind(left)?, self.bind(right)?];
                Self::bind_operator(operator, operands, *position)
            },
            Expr::FunctionCall { function,
                                 arguments,
                                 position, } => {
                let arguments = arguments.iter()
                                         .map(|argument| self.bind(argument))
                                         .collect::<BindResult<Vec<_>>>()?;
                Self::bind_function(*function, arguments, *position)
            },
        }
    }

    fn bind_variable(&self, name: &str, position: Position) -> BindResult<Node> {
        let entry =
            self.catalogue
                .variable(name)
                .ok_or_else(|| BindError::UnknownVariable { name: name.to_string(),
                                                            position })?;

        Ok(Node::Variable(VariableRef { name:  name.to_string(),
                                        class: entry.class,
                                        kind:  entry.kind, }))
    }

    fn bind_property(&self, identifier: &str, position: Position) -> BindResult<Node> {
        let column =
            self.catalogue
                .property(identifier)
                .ok_or_else(|| BindError::UnknownProperty { name: identifier.to_string(),
                                                            position })?;

        Ok(Node::Property(PropertyRef { identifier: identifier.to_string(),
                                        column:     column.to_string(), }))
    }

    /// Checks operator operands: every operand must be numeric.
    fn bind_operator(operator: Operator,
                     operands: Vec<Node>,
                     position: Position)
                     -> BindResult<Node> {
        let name = operator.symbol();
        check_count(name, operator.arity(), operands.len(), position)?;
        for (index, operand) in operands.iter().enumerate() {
            check_kinds(name, index, KindSet::NUMERIC, operand, position)?;
        }

        trace!(operator = name, "bound operator");
        Ok(Node::Operator(OperatorNode { operator, operands }))
    }

    /// Checks a call against its registry signature and builds a fresh node.
    fn bind_function(function: Function,
                     arguments: Vec<Node>,
                     position: Position)
                     -> BindResult<Node> {
        let name = function.name();
        let signature = function.signature();
        check_count(name, signature.arity(), arguments.len(), position)?;

        for (index, (param, argument)) in signature.params.iter().zip(&arguments).enumerate() {
            check_kinds(name, index, param.kinds, argument, position)?;
            check_shape(name, index, param.shape, argument, position)?;
        }

        if signature.comparable
           && let [left, right, ..] = arguments.as_slice()
        {
            check_comparable(name, left.return_kinds(), right.return_kinds(), position)?;
        }

        trace!(function = name, "bound function");
        Ok(Node::Function(FunctionNode { function, arguments }))
    }
}

fn check_count(function: &str, expected: usize, found: usize, position: Position) -> BindResult<()> {
    if expected == found {
        return Ok(());
    }
    Err(BindError::ArgumentCountMismatch { function: function.to_string(),
                                           expected,
                                           found,
                                           position })
}

/// Every kind the argument may return has to be accepted by the slot.
fn check_kinds(function: &str,
               index: usize,
               expected: KindSet,
               argument: &Node,
               position: Position)
               -> BindResult<()> {
    let found = argument.return_kinds();
    if expected.contains_all(found) {
        return Ok(());
    }
    Err(BindError::ArgumentTypeMismatch { function: function.to_string(),
                                          slot: index + 1,
                                          expected,
                                          found,
                                          position })
}

fn check_shape(function: &str,
               index: usize,
               shape: Shape,
               argument: &Node,
               position: Position)
               -> BindResult<()> {
    let fits = match shape {
        Shape::Any => true,
        Shape::Column => matches!(argument, Node::Variable(_) | Node::Property(_)),
        Shape::Constant => matches!(argument, Node::Constant(_)),
    };
    if fits {
        return Ok(());
    }
    Err(BindError::ArgumentShapeMismatch { function: function.to_string(),
                                           slot: index + 1,
                                           expected: shape.describe(),
                                           position })
}

/// Compared arguments must both be numeric or both be text.
fn check_comparable(function: &str,
                    left: KindSet,
                    right: KindSet,
                    position: Position)
                    -> BindResult<()> {
    let both_within = |kinds: KindSet| kinds.contains_all(left) && kinds.contains_all(right);
    if both_within(KindSet::NUMERIC) || both_within(KindSet::TEXT) {
        return Ok(());
    }
    Err(BindError::IncomparableArguments { function: function.to_string(),
                                           left,
                                           right,
                                           position })
}
