/// The lexer module tokenizes equation text for further parsing.
///
/// The lexer reads the raw equation and produces a stream of tokens, each
/// corresponding to a number, string, quoted name, identifier or symbol,
/// together with its line and column. This is the first stage of the
/// pipeline.
///
/// # Responsibilities
/// - Converts the input character stream into positioned tokens.
/// - Reports lexical errors for stray characters, unterminated quotes and
///   malformed numbers.
pub mod lexer;
/// The parser module builds the unbound syntax tree from tokens.
///
/// # Responsibilities
/// - Converts tokens into [`Expr`](crate::ast::Expr) nodes with standard
///   arithmetic precedence.
/// - Resolves function names against the registry.
/// - Reports syntax errors with the offending token and its position.
pub mod parser;
/// The catalogue of names an equation may refer to.
///
/// Holds the host's parameter and result variables, with their kinds, and
/// the metadata properties with the grid columns they map to.
pub mod catalogue;
/// The closed table of built-in functions.
///
/// Each entry declares a function's arity, the kinds and shapes each argument
/// slot accepts, what it returns and how it is evaluated. The binder builds
/// fresh function nodes from these entries.
pub mod registry;
/// The binder validates syntax trees and produces bound trees.
///
/// # Responsibilities
/// - Resolves variables and properties against the catalogue.
/// - Checks arity, argument kinds and argument shapes of every call.
/// - Never touches data, so binding happens once per equation.
pub mod binder;
/// Bound, immutable equation trees.
pub mod node;
/// The data grid contract and its in-crate table implementation.
pub mod grid;
/// The evaluator module applies bound trees to data grids.
///
/// The evaluator walks a bound tree children first, derives one column per
/// operator and function node, and returns the name of the root's column.
///
/// # Responsibilities
/// - Materialises constants and checks that referenced columns exist.
/// - Runs per-row, aggregate, lookup, conditional and coalescing strategies.
/// - Derives each distinct column once per pass.
pub mod evaluator;
/// The value module defines the typed, metadata-bearing cells of a grid.
///
/// # Responsibilities
/// - Defines `Datum`, the integer, real or text payload of a cell.
/// - Defines `Value`, a datum plus its error, rank and counts.
/// - Provides numeric widening that preserves metadata.
pub mod value;
/// Named derived variables defined by the user.
pub mod derived;
