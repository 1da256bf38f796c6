/// Core evaluation logic.
///
/// Contains the `Evaluator`, its post-order walk over bound trees, leaf
/// handling and per-pass memoisation of derived columns.
pub mod core;

/// Arithmetic operator evaluation.
///
/// Implements negation and the four binary operators as per-row kernels.
pub mod operator;

/// Function evaluation.
///
/// Dispatches a bound function call to its registry strategy: per-row
/// transforms, aggregates, cross-row lookups, row-local conditionals and
/// null coalescing.
pub mod function;
