use std::iter::Peekable;

use tracing::instrument;

use crate::{
    ast::{Expr, Position},
    error::ParseError,
    interpreter::{lexer::Token, parser::binary::parse_additive},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete equation.
///
/// This is the entry point for parsing. The token stream must be the output
/// of [`tokenize`](crate::interpreter::lexer::tokenize): every token but the
/// final [`Token::End`] has to be consumed by a single expression.
///
/// Grammar: `equation := expression END`
///
/// # Parameters
/// - `tokens`: `(Token, Position)` pairs ending with `Token::End`.
///
/// # Returns
/// The unbound syntax tree of the equation.
///
/// # Errors
/// - `EmptyEquation` if there is nothing before the end of input.
/// - `UnexpectedTrailingTokens` if tokens remain after the expression.
/// - Any error raised while parsing the expression itself.
///
/// ## Example
/// ```
/// use derived_metrics::{
///     ast::{BinaryOperator, Expr},
///     interpreter::{lexer::tokenize, parser::core::parse_equation},
/// };
///
/// let tokens = tokenize("'PE Count' / 2").unwrap();
/// let expr = parse_equation(&tokens).unwrap();
///
/// assert!(matches!(expr, Expr::BinaryOp { op: BinaryOperator::Div, .. }));
/// ```
#[instrument(name = "engine::parser::parse_equation", level = "trace", skip(tokens))]
pub fn parse_equation(tokens: &[(Token, Position)]) -> ParseResult<Expr> {
    let mut iter = tokens.iter().peekable();
    if matches!(iter.peek(), None | Some((Token::End, _))) {
        return Err(ParseError::EmptyEquation);
    }

    let expr = parse_expression(&mut iter)?;

    match iter.next() {
        None | Some((Token::End, _)) => Ok(expr),
        Some((tok, position)) => Err(ParseError::UnexpectedTrailingTokens { token:    tok.to_string(),
                                                                            position: *position, }),
    }
}

/// Parses a full expression.
///
/// It begins at the lowest-precedence level, addition, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := term (("+" | "-") term)*`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Position)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    parse_additive(tokens)
}
