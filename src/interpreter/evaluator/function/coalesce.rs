use crate::interpreter::{grid::DataGrid, value::Value};

/// Evaluates `or(first, second)` row by row: the first cell where present,
/// else the second, which may itself be absent.
pub(crate) fn or<G>(grid: &G, columns: &[String]) -> Vec<Option<Value>>
    where G: DataGrid + ?Sized
{
    let [first, second] = columns else {
        return vec![None; grid.len()];
    };

    (0..grid.len()).map(|row| grid.value(row, first).or_else(|| grid.value(row, second)).cloned())
                   .collect()
}
