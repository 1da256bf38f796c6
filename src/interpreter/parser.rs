/// Core parsing logic.
///
/// Contains the equation entry point, the top-level expression rule and the
/// `ParseResult` alias shared by the other parser modules.
pub mod core;

/// Unary and primary expressions.
///
/// Handles negation, literals, quoted names, properties, function calls and
/// parenthesised groups.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the left-associative additive and multiplicative precedence
/// levels.
pub mod binary;

/// Utility functions for the parser.
pub mod utils;
