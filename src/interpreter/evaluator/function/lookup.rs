use tracing::trace;

use crate::{
    error::EvalError,
    interpreter::{evaluator::core::EvalResult, grid::DataGrid, node::Node, value::Value},
};

/// Evaluates `find(value, property, constant)`.
///
/// Scans the rows in order for the first one whose `property` cell matches
/// its `constant` cell, and writes that row's `value`, widened to a real, to
/// every row. If the matching row has no numeric value the whole column is
/// absent. An empty grid yields an empty column.
///
/// # Errors
/// `NoMatchingRow` if the grid has rows but none matches.
pub(crate) fn find<G>(grid: &G, columns: &[String], node: &Node) -> EvalResult<Vec<Option<Value>>>
    where G: DataGrid + ?Sized
{
    let [value, property, constant] = columns else {
        return Ok(vec![None; grid.len()]);
    };
    if grid.is_empty() {
        return Ok(Vec::new());
    }

    let matching = (0..grid.len()).find(|&row| {
                                      match (grid.value(row, property), grid.value(row, constant)) {
                                          (Some(p), Some(c)) => p.datum.matches(&c.datum),
                                          _ => false,
                                      }
                                  });

    let Some(row) = matching else {
        return Err(EvalError::NoMatchingRow { property: property.clone(),
                                              value:    constant.clone(),
                                              node:     node.to_string(), });
    };
    trace!(row, property = %property, "find matched");

    let found = grid.value(row, value).and_then(Value::to_real);
    Ok(vec![found; grid.len()])
}
