use std::collections::HashSet;

use tracing::{debug, instrument, trace};

use crate::{
    error::EvalError,
    interpreter::{
        grid::DataGrid,
        node::Node,
        value::{Rank, Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvalError` describing the failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// Applies bound trees to data grids.
///
/// The evaluator walks a tree children first. Leaves that reference columns
/// only check that the column exists; every other node writes its derived
/// column to the grid. Within one call to [`Evaluator::evaluate`], a column
/// name that has already been produced is not computed again, so a
/// sub-expression repeated anywhere in the tree is derived once.
///
/// ## Usage
///
/// An `Evaluator` holds no state between calls and may be reused for any
/// number of trees and grids.
#[derive(Debug, Default)]
pub struct Evaluator {
    /// Columns written during the current pass.
    produced: HashSet<String>,
}

impl Evaluator {
    /// Creates an evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates a bound tree against `grid` and returns the name of the
    /// column holding the result.
    ///
    /// Evaluating the same tree against the same grid again rewrites the same
    /// columns with the same values.
    ///
    /// # Errors
    /// - `MissingColumn` if a referenced variable or property is not declared
    ///   on the grid.
    /// - `NoMatchingRow` if a `find` matches no row.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::{
    ///     evaluator::core::Evaluator,
    ///     grid::{DataGrid, Row, Table},
    ///     node::{Constant, FunctionNode, Node},
    ///     registry::Function,
    ///     value::Datum,
    /// };
    ///
    /// let mut table = Table::new();
    /// table.push_row(Row::new());
    ///
    /// let node = Node::Function(FunctionNode { function:  Function::Abs,
    ///                                          arguments: vec![Node::Constant(Constant {
    ///                                              datum: Datum::from(-3_i64),
    ///                                          })], });
    /// let column = Evaluator::new().evaluate(&node, &mut table).unwrap();
    ///
    /// assert_eq!(column, "abs(-3)");
    /// assert_eq!(table.value(0, &column).unwrap().datum, Datum::from(3_i64));
    /// ```
    #[instrument(name = "engine::evaluator::evaluate", level = "debug", skip_all, fields(root = %node, rows = grid.len()))]
    pub fn evaluate<G>(&mut self, node: &Node, grid: &mut G) -> EvalResult<String>
        where G: DataGrid + ?Sized
    {
        self.produced.clear();
        self.eval_node(node, grid)
    }

    /// Evaluates one node, children first.
    pub(crate) fn eval_node<G>(&mut self, node: &Node, grid: &mut G) -> EvalResult<String>
        where G: DataGrid + ?Sized
    {
        match node {
            Node::Variable(v) => Self::require_column(&v.name, node, grid),
            Node::Property(p) => Self::require_column(&p.column, node, grid),
            Node::Constant(_) | Node::Operator(_) | Node::Function(_) => self.derive(node, grid),
        }
    }

    /// Evaluates the children of `node`, returning their column names in
    /// argument order.
    pub(crate) fn eval_children<G>(&mut self, node: &Node, grid: &mut G) -> EvalResult<Vec<String>>
        where G: DataGrid + ?Sized
    {
        node.children()
            .iter()
            .map(|child| self.eval_node(child, grid))
            .collect()
    }

    /// Produces the column of a constant, operator or function node, unless
    /// it was already produced in this pass.
    fn derive<G>(&mut self, node: &Node, grid: &mut G) -> EvalResult<String>
        where G: DataGrid + ?Sized
    {
        let column = node.column_name();
        if self.produced.contains(&column) {
            trace!(column = %column, "column already derived in this pass");
            return Ok(column);
        }

        let values = match node {
            Node::Constant(c) => {
                let cell = Value::new(c.datum.kind().name(), Rank::Unknown, c.datum.clone());
                vec![Some(cell); grid.len()]
            },
            Node::Operator(o) => self.eval_operator(o, node, grid)?,
            Node::Function(f) => self.eval_function(f, node, grid)?,
            Node::Variable(_) | Node::Property(_) => return Ok(column),
        };

        debug!(column = %column, rows = values.len(), "derived column");
        grid.put_column(&column, values);
        self.produced.insert(column.clone());
        Ok(column)
    }

    fn require_column<G>(column: &str, node: &Node, grid: &G) -> EvalResult<String>
        where G: DataGrid + ?Sized
    {
        if grid.has_column(column) {
            return Ok(column.to_string());
        }
        Err(EvalError::MissingColumn { column: column.to_string(),
                                       node:   node.to_string(), })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{
        catalogue::VariableClass,
        grid::{Row, Table},
        node::{Constant, FunctionNode, Operator, OperatorNode, VariableRef},
        registry::Function,
        value::{Datum, ValueKind},
    };

    fn time() -> Node {
        Node::Variable(VariableRef { name:  "time".to_string(),
                                     class: VariableClass::Result,
                                     kind:  ValueKind::Real, })
    }

    fn table() -> Table {
        let mut table = Table::with_columns(["time"]);
        for t in [1.0, 2.0, 4.0] {
            table.push_row(Row::new().with("time", Value::new("time", Rank::Process(0), t)));
        }
        table
    }

    #[test]
    fn constants_fill_every_row() {
        let mut table = table();
        let node = Node::Constant(Constant { datum: Datum::from(2.0) });

        let column = Evaluator::new().evaluate(&node, &mut table).unwrap();

        assert_eq!(column, "2.0");
        for cell in table.column("2.0") {
            let cell = cell.unwrap();
            assert_eq!(cell.datum, Datum::from(2.0));
            assert_eq!(cell.name, "Real");
        }
    }

    #[test]
    fn missing_columns_name_the_referencing_node() {
        let mut table = Table::new();
        let err = Evaluator::new().evaluate(&time(), &mut table).unwrap_err();

        assert_eq!(err,
                   EvalError::MissingColumn { column: "time".to_string(),
                                              node:   "time".to_string(), });
    }

    #[test]
    fn repeated_subexpressions_share_one_column() {
        let mut table = table();
        let avg = Node::Function(FunctionNode { function:  Function::Avg,
                                                arguments: vec![time()], });
        let node = Node::Operator(OperatorNode { operator: Operator::Sub,
                                                 operands: vec![avg.clone(), avg], });

        let column = Evaluator::new().evaluate(&node, &mut table).unwrap();

        assert_eq!(column, "avg(time)-avg(time)");
        assert_eq!(table.column_names(),
                   ["time".to_string(), "avg(time)".to_string(), column.clone()]);
        assert!(table.column(&column).iter().all(|c| c.unwrap().real() == Some(0.0)));
    }
}
