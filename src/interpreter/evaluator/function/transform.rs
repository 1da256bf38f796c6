use crate::{
    interpreter::{
        grid::DataGrid,
        registry::RowKernel,
        value::{Datum, Value},
    },
    util::num::i64_to_f64,
};

/// Computes each row from the same row of `columns`.
///
/// A row where any column is absent stays absent; otherwise the kernel
/// receives the cells in column order.
pub(crate) fn per_row<G>(grid: &G, columns: &[String], kernel: RowKernel) -> Vec<Option<Value>>
    where G: DataGrid + ?Sized
{
    (0..grid.len()).map(|row| {
                       let cells = columns.iter()
                                          .map(|column| grid.value(row, column))
                                          .collect::<Option<Vec<_>>>()?;
                       kernel(&cells)
                   })
                   .collect()
}

/// Applies a real function to a numeric value.
///
/// The generated kernels accept exactly one argument. Integers are widened to
/// reals first; the result keeps the argument's metadata and error. Text
/// arguments produce no value.
///
/// # Example
/// ```
/// use derived_metrics::interpreter::{
///     evaluator::function::transform::sin,
///     value::{Rank, Value},
/// };
///
/// let x = Value::new("angle", Rank::AllRanks, std::f64::consts::PI / 2.0);
/// let r = sin(&[&x]).unwrap();
///
/// assert_eq!(r.real(), Some(1.0));
/// assert_eq!(r.name, "angle");
/// ```
macro_rules! real_builtin {
    ($fname:ident, $real_fn:ident) => {
        pub fn $fname(args: &[&Value]) -> Option<Value> {
            let [x] = args else {
                return None;
            };
            let x = x.to_real()?;
            let value = x.real()?.$real_fn();
            Some(x.update_datum(value))
        }
    };
}

real_builtin!(sin, sin);
real_builtin!(cos, cos);
real_builtin!(tan, tan);
real_builtin!(log, ln);

/// Absolute value.
///
/// Integers stay integral; `i64::MIN`, whose magnitude has no `i64`, becomes
/// a real.
pub fn abs(args: &[&Value]) -> Option<Value> {
    let [x] = args else {
        return None;
    };
    let datum = match &x.datum {
        Datum::Integer(i) => i.checked_abs()
                              .map_or_else(|| Datum::from(i64_to_f64(*i).abs()), Datum::from),
        Datum::Real(r) => Datum::from(r.0.abs()),
        Datum::Text(_) => return None,
    };
    Some(x.update_datum(datum))
}

/// Raises the first argument to the power of the second.
///
/// The result keeps the base's metadata and error.
pub fn pow(args: &[&Value]) -> Option<Value> {
    let [base, exponent] = args else {
        return None;
    };
    let base = base.to_real()?;
    let value = base.real()?.powf(exponent.real()?);
    Some(base.update_datum(value))
}
