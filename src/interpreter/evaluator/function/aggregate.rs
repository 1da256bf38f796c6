use crate::{
    interpreter::{
        grid::DataGrid,
        registry::Reduction,
        value::{Rank, Value},
    },
    util::num::usize_to_f64,
};

/// A reduced column: its scalar value and the error that goes with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduced {
    /// The reduced value; NaN when there was nothing to reduce.
    pub value: f64,
    /// The reduced error, if any contributing cell had one.
    pub error: Option<f64>,
}

/// Reduces every numeric cell of `column`.
///
/// Absent and text cells are skipped. The mean averages values and, over the
/// cells that carry one, errors. The extremes skip NaN cells and take the
/// value and error of the row holding the extreme; ties go to the earliest
/// row.
///
/// ## Example
/// ```
/// use derived_metrics::interpreter::{
///     evaluator::function::aggregate::reduce,
///     grid::{Row, Table},
///     registry::Reduction,
///     value::{Rank, Value},
/// };
///
/// let mut table = Table::new();
/// for (t, e) in [(2.0, 0.2), (6.0, 0.4)] {
///     table.push_row(Row::new().with("t", Value::new("t", Rank::AllRanks, t).with_error(e)));
/// }
///
/// let mean = reduce(&table, "t", Reduction::Mean);
/// assert_eq!(mean.value, 4.0);
/// assert!((mean.error.unwrap() - 0.3).abs() < 1e-12);
///
/// let max = reduce(&table, "t", Reduction::Max);
/// assert_eq!((max.value, max.error), (6.0, Some(0.4)));
/// ```
pub fn reduce<G>(grid: &G, column: &str, reduction: Reduction) -> Reduced
    where G: DataGrid + ?Sized
{
    let samples: Vec<Reduced> =
        (0..grid.len()).filter_map(|row| grid.value(row, column))
                       .filter_map(|cell| {
                           Some(Reduced { value: cell.real()?,
                                          error: cell.error_real(), })
                       })
                       .collect();

    let empty = Reduced { value: f64::NAN,
                          error: None, };

    match reduction {
        Reduction::Mean => {
            if samples.is_empty() {
                return empty;
            }
            let value = samples.iter().map(|s| s.value).sum::<f64>() / usize_to_f64(samples.len());
            let errors: Vec<f64> = samples.iter().filter_map(|s| s.error).collect();
            let error = (!errors.is_empty()).then(|| {
                                                errors.iter().sum::<f64>() / usize_to_f64(errors.len())
                                            });
            Reduced { value, error }
        },
        Reduction::Min => samples.into_iter()
                                 .filter(|s| !s.value.is_nan())
                                 .reduce(|best, s| if s.value < best.value { s } else { best })
                                 .unwrap_or(empty),
        Reduction::Max => samples.into_iter()
                                 .filter(|s| !s.value.is_nan())
                                 .reduce(|best, s| if s.value > best.value { s } else { best })
                                 .unwrap_or(empty),
    }
}

/// Reduces the single argument column and writes the scalar to every row.
///
/// A row whose argument cell is numeric keeps that cell's metadata; any other
/// row gets a fresh value named after the argument column.
pub(crate) fn broadcast<G>(grid: &G, columns: &[String], reduction: Reduction) -> Vec<Option<Value>>
    where G: DataGrid + ?Sized
{
    let [column] = columns else {
        return vec![None; grid.len()];
    };
    let Reduced { value, error } = reduce(grid, column, reduction);

    (0..grid.len()).map(|row| {
                       let base = grid.value(row, column)
                                      .and_then(Value::to_real)
                                      .unwrap_or_else(|| Value::new(column.as_str(), Rank::Unknown, value));
                       Some(base.update_real(value, error))
                   })
                   .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{
        grid::{Row, Table},
        value::Datum,
    };

    fn table(cells: &[Option<f64>]) -> Table {
        let mut table = Table::with_columns(["t"]);
        for (rank, cell) in (0_i64..).zip(cells) {
            let row = match cell {
                Some(t) => Row::new().with("t", Value::new("t", Rank::Process(rank), *t)),
                None => Row::new(),
            };
            table.push_row(row);
        }
        table
    }

    #[test]
    fn absent_cells_are_skipped_but_still_receive_the_scalar() {
        let table = table(&[Some(1.0), None, Some(3.0)]);
        let cells = broadcast(&table, &["t".to_string()], Reduction::Mean);

        assert_eq!(cells.len(), 3);
        for cell in &cells {
            assert_eq!(cell.as_ref().unwrap().datum, Datum::from(2.0));
        }
        assert_eq!(cells[0].as_ref().unwrap().rank, Rank::Process(0));
        assert_eq!(cells[1].as_ref().unwrap().rank, Rank::Unknown);
        assert_eq!(cells[1].as_ref().unwrap().name, "t");
    }

    #[test]
    fn extremes_carry_their_own_error() {
        let mut table = Table::new();
        for (t, e) in [(5.0, 0.5), (1.0, 0.1), (9.0, 0.9)] {
            table.push_row(Row::new().with("t", Value::new("t", Rank::Unknown, t).with_error(e)));
        }

        assert_eq!(reduce(&table, "t", Reduction::Min),
                   Reduced { value: 1.0,
                             error: Some(0.1), });
        assert_eq!(reduce(&table, "t", Reduction::Max),
                   Reduced { value: 9.0,
                             error: Some(0.9), });
    }

    #[test]
    fn extremes_ignore_nan_wherever_it_sits() {
        for cells in [[Some(f64::NAN), Some(1.0), Some(4.0)], [Some(1.0), Some(4.0), Some(f64::NAN)]] {
            let table = table(&cells);
            assert_eq!(reduce(&table, "t", Reduction::Min).value, 1.0);
            assert_eq!(reduce(&table, "t", Reduction::Max).value, 4.0);
        }

        let only_nan = table(&[Some(f64::NAN)]);
        assert!(reduce(&only_nan, "t", Reduction::Min).value.is_nan());
    }

    #[test]
    fn nothing_to_reduce_gives_nan() {
        let table = table(&[None, None]);
        for reduction in [Reduction::Mean, Reduction::Min, Reduction::Max] {
            let reduced = reduce(&table, "t", reduction);
            assert!(reduced.value.is_nan());
            assert_eq!(reduced.error, None);
        }
    }
}
