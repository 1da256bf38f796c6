//! # derived-metrics
//!
//! derived-metrics is an expression engine for benchmark result sets written
//! in Rust. It lets users define new metrics from stored parameters and
//! results, such as `avg('Application Time') + 'PE Count' / log(2)`,
//! type-checks them against the data they will be applied to, and evaluates
//! them into new named columns.
//!
//! The pipeline is: equation text → lexer → parser → binder → evaluator.
//! [`Equation`] runs the first three stages once; the compiled equation can
//! then be evaluated against any number of grids.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::instrument;

pub use crate::interpreter::{lexer::tokenize, parser::core::parse_equation};
use crate::{
    error::EngineError,
    interpreter::{
        binder::Binder,
        catalogue::Catalogue,
        evaluator::core::{EvalResult, Evaluator},
        grid::DataGrid,
        node::Node,
    },
};

/// Defines the structure of parsed equations.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of an equation as a tree. The tree is built by the
/// parser and consumed by the binder.
///
/// # Responsibilities
/// - Defines literals, names, operators and function calls.
/// - Attaches source positions to every node for error reporting.
pub mod ast;
/// Provides unified error types for parsing, binding and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// binding or evaluating an equation. Each carries the source position or
/// the node it concerns.
///
/// # Responsibilities
/// - Defines one error enum per pipeline stage.
/// - Defines `EngineError`, which wraps all three.
/// - Implements `Display` and `std::error::Error` for reporting.
pub mod error;
/// Orchestrates the whole pipeline.
///
/// This module ties together lexing, parsing, binding, evaluation, the
/// function registry, the catalogue, the data grid and value
/// representations.
pub mod interpreter;
/// General utilities for safe numeric conversion and printing.
pub mod util;

/// A compiled equation: parsed, bound and ready to evaluate.
///
/// Compiling resolves every name and checks every argument, so a compiled
/// equation can only fail at evaluation time because of the grid it is given.
/// It is immutable and can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    text: String,
    root: Node,
}

impl Equation {
    /// Lexes, parses and binds `text` against `catalogue`.
    ///
    /// # Errors
    /// Returns `EngineError::Parse` for malformed text and
    /// `EngineError::Bind` for calls whose arguments do not fit.
    ///
    /// # Examples
    /// ```
    /// use derived_metrics::{
    ///     Equation,
    ///     error::EngineError,
    ///     interpreter::catalogue::{Catalogue, VariableClass},
    ///     interpreter::value::ValueKind,
    /// };
    ///
    /// let catalogue = Catalogue::new().with_variable("PE Count",
    ///                                                VariableClass::Parameter,
    ///                                                ValueKind::Integer);
    ///
    /// let equation = Equation::compile("'PE Count' / log(2)", &catalogue).unwrap();
    /// assert_eq!(equation.column_name(), "PE Count/log(2)");
    ///
    /// let err = Equation::compile("'PE Count' / log(\"two\")", &catalogue).unwrap_err();
    /// assert!(matches!(err, EngineError::Bind(_)));
    /// ```
    #[instrument(name = "engine::equation::compile", level = "debug", skip(catalogue))]
    pub fn compile(text: &str, catalogue: &Catalogue) -> Result<Self, EngineError> {
        let tokens = tokenize(text)?;
        let expr = parse_equation(&tokens)?;
        let root = Binder::new(catalogue).bind(&expr)?;

        Ok(Self { text: text.to_string(),
                  root })
    }

    /// The equation as written.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The bound tree.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// The name of the column evaluation will produce.
    #[must_use]
    pub fn column_name(&self) -> String {
        self.root.column_name()
    }

    /// Evaluates the equation against `grid` and returns the name of the
    /// derived column.
    ///
    /// # Errors
    /// Returns an `EvalError` if the grid lacks a referenced column or a
    /// lookup matches no row.
    pub fn evaluate<G>(&self, grid: &mut G) -> EvalResult<String>
        where G: DataGrid + ?Sized
    {
        Evaluator::new().evaluate(&self.root, grid)
    }
}

/// Compiles `text` and evaluates it against `grid` in one step.
///
/// # Errors
/// Returns an error if compiling or evaluating fails.
///
/// # Examples
/// ```
/// use derived_metrics::{
///     derive_column,
///     interpreter::{
///         catalogue::{Catalogue, VariableClass},
///         grid::{DataGrid, Row, Table},
///         value::{Rank, Value, ValueKind},
///     },
/// };
///
/// let catalogue = Catalogue::new().with_variable("Time", VariableClass::Result, ValueKind::Real);
/// let mut table = Table::with_columns(["Time"]);
/// for t in [1.0, -3.0] {
///     table.push_row(Row::new().with("Time", Value::new("Time", Rank::AllRanks, t)));
/// }
///
/// let column = derive_column("abs('Time')", &catalogue, &mut table).unwrap();
/// assert_eq!(column, "abs(Time)");
/// assert_eq!(table.value(1, &column).unwrap().real(), Some(3.0));
///
/// // 'Speed' is not in the catalogue.
/// assert!(derive_column("'Speed' * 2", &catalogue, &mut table).is_err());
/// ```
pub fn derive_column<G>(text: &str,
                        catalogue: &Catalogue,
                        grid: &mut G)
                        -> Result<String, EngineError>
    where G: DataGrid + ?Sized
{
    Ok(Equation::compile(text, catalogue)?.evaluate(grid)?)
}
