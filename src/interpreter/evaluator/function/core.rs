use crate::interpreter::{
    evaluator::{
        core::{EvalResult, Evaluator},
        function::{aggregate, coalesce, conditional, lookup, transform},
    },
    grid::DataGrid,
    node::{FunctionNode, Node},
    registry::Strategy,
    value::Value,
};

impl Evaluator {
    /// Evaluates a function call.
    ///
    /// The arguments are evaluated first, then the function's registry
    /// strategy computes the derived cells from the argument columns.
    ///
    /// # Parameters
    /// - `function`: The bound call.
    /// - `node`: The node wrapping `function`, for its children and errors.
    /// - `grid`: The data grid.
    ///
    /// # Returns
    /// One cell per row, ready to be written under the node's column name.
    ///
    /// # Errors
    /// Errors from evaluating the arguments, and `NoMatchingRow` from `find`.
    pub(crate) fn eval_function<G>(&mut self,
                                   function: &FunctionNode,
                                   node: &Node,
                                   grid: &mut G)
                                   -> EvalResult<Vec<Option<Value>>>
        where G: DataGrid + ?Sized
    {
        let columns = self.eval_children(node, grid)?;

        match function.function.strategy() {
            Strategy::PerRow(kernel) => Ok(transform::per_row(grid, &columns, kernel)),
            Strategy::Aggregate(reduction) => Ok(aggregate::broadcast(grid, &columns, reduction)),
            Strategy::Lookup => lookup::find(grid, &columns, node),
            Strategy::Conditional => Ok(conditional::ifeq(grid, &columns)),
            Strategy::Coalesce => Ok(coalesce::or(grid, &columns)),
        }
    }
}
