use crate::interpreter::{grid::DataGrid, value::Value};

/// Evaluates `ifeq(left, right)` row by row.
///
/// A row where both cells are present gets `1.0` if they match and `0.0`
/// otherwise, with an error of `0.0` and the left cell's metadata. Numbers
/// match by value regardless of integer or real kind. A row where either
/// cell is absent stays absent.
pub(crate) fn ifeq<G>(grid: &G, columns: &[String]) -> Vec<Option<Value>>
    where G: DataGrid + ?Sized
{
    let [left, right] = columns else {
        return vec![None; grid.len()];
    };

    (0..grid.len()).map(|row| {
                       let l = grid.value(row, left)?;
                       let r = grid.value(row, right)?;
                       let flag = if l.datum.matches(&r.datum) { 1.0 } else { 0.0 };
                       Some(l.update_real(flag, Some(0.0)))
                   })
                   .collect()
}
