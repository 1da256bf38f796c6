/// Dispatch of bound function calls to their strategies.
pub mod core;
/// Per-row transforms.
///
/// The kernels behind `abs`, `sin`, `cos`, `tan`, `log` and `pow`, and the
/// row loop shared with the arithmetic operators.
pub mod transform;
/// Whole-column aggregates: `avg`, `min` and `max`.
///
/// Reduces one column to a scalar and writes it back to every row.
pub mod aggregate;
/// The `find` cross-row lookup.
pub mod lookup;
/// The `ifeq` row-local conditional.
pub mod conditional;
/// The `or` null-coalescing function.
pub mod coalesce;
