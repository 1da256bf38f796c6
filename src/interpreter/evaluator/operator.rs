use crate::interpreter::{
    evaluator::{
        core::{EvalResult, Evaluator},
        function::transform::per_row,
    },
    grid::DataGrid,
    node::{Node, Operator, OperatorNode},
    registry::RowKernel,
    value::Value,
};

/// Defines a binary arithmetic kernel.
///
/// Both operands are widened to reals. The result keeps the left operand's
/// metadata and error; only its magnitude changes. Division by zero follows
/// IEEE 754 and yields an infinity or NaN.
///
/// # Example
/// ```
/// use derived_metrics::interpreter::{
///     evaluator::operator::divide,
///     value::{Rank, Value},
/// };
///
/// let l = Value::new("time", Rank::Process(1), 3_i64).with_error(1_i64);
/// let r = Value::new("count", Rank::Process(1), 2_i64);
/// let q = divide(&[&l, &r]).unwrap();
///
/// assert_eq!(q.real(), Some(1.5));
/// assert_eq!(q.error_real(), Some(1.0));
/// assert_eq!(q.rank, Rank::Process(1));
/// ```
macro_rules! arithmetic_kernel {
    ($fname:ident, $op:tt) => {
        pub fn $fname(args: &[&Value]) -> Option<Value> {
            let [left, right] = args else {
                return None;
            };
            let left = left.to_real()?;
            let value = left.real()? $op right.real()?;
            Some(left.update_datum(value))
        }
    };
}

arithmetic_kernel!(add, +);
arithmetic_kernel!(subtract, -);
arithmetic_kernel!(multiply, *);
arithmetic_kernel!(divide, /);

/// Negates a value, keeping its metadata and error.
pub fn negate(args: &[&Value]) -> Option<Value> {
    let [operand] = args else {
        return None;
    };
    let operand = operand.to_real()?;
    let value = -operand.real()?;
    Some(operand.update_datum(value))
}

/// Gets the per-row kernel of an operator.
#[must_use]
pub fn kernel(operator: Operator) -> RowKernel {
    match operator {
        Operator::Negate => negate,
        Operator::Add => add,
        Operator::Sub => subtract,
        Operator::Mul => multiply,
        Operator::Div => divide,
    }
}

impl Evaluator {
    /// Evaluates an operator node.
    ///
    /// The operands are evaluated first; each row of the result is then
    /// computed from the same row of the operands. A row where any operand is
    /// absent stays absent.
    ///
    /// # Parameters
    /// - `operator`: The bound operator.
    /// - `node`: The node wrapping `operator`, for its children.
    /// - `grid`: The data grid.
    ///
    /// # Returns
    /// One cell per row, ready to be written under the node's column name.
    pub(crate) fn eval_operator<G>(&mut self,
                                   operator: &OperatorNode,
                                   node: &Node,
                                   grid: &mut G)
                                   -> EvalResult<Vec<Option<Value>>>
        where G: DataGrid + ?Sized
    {
        let columns = self.eval_children(node, grid)?;
        Ok(per_row(grid, &columns, kernel(operator.operator)))
    }
}
