use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, Position, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{parse_comma_separated, unexpected},
        },
        registry::Function,
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operator `-`. Negation is right-associative, so `--x`
/// is parsed as `-(-x)`. A `-` written directly before a numeric literal is
/// folded into a negative literal, so `-2` is the constant `-2` rather than a
/// negation of `2`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`].
///
/// Grammar:
/// ```text
///     factor := "-" factor
///             | primary
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`], a negative literal, or a primary expression.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let Some((Token::Minus, position)) = tokens.peek() else {
        return parse_primary(tokens);
    };
    let position = *position;
    tokens.next();

    let folded = match tokens.peek() {
        Some((Token::Integer(i), _)) => Some(LiteralValue::Integer(-*i)),
        Some((Token::Real(r), _)) => Some(LiteralValue::Real(-*r)),
        _ => None,
    };
    if let Some(value) = folded {
        tokens.next();
        return Ok(Expr::Literal { value, position });
    }

    let expr = parse_unary(tokens)?;
    Ok(Expr::UnaryOp { op: UnaryOperator::Negate,
                       expr: Box::new(expr),
                       position })
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric and string literals
/// - quoted variable names
/// - bare property identifiers
/// - function calls
/// - parenthesized expressions
///
/// Grammar:
/// ```text
///     primary := NUMBER | STRING | QUOTED_NAME | IDENTIFIER
///              | IDENTIFIER "(" [expression ("," expression)*] ")"
///              | "(" expression ")"
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let (token, position) =
        tokens.next()
              .ok_or(ParseError::UnexpectedEndOfInput { position: Position::default() })?;
    let position = *position;

    match token {
        Token::Integer(i) => Ok(Expr::Literal { value: LiteralValue::Integer(*i),
                                                position }),
        Token::Real(r) => Ok(Expr::Literal { value: LiteralValue::Real(*r),
                                             position }),
        Token::Str(s) => Ok(Expr::Literal { value: LiteralValue::Text(s.clone()),
                                            position }),
        Token::QuotedName(name) => Ok(Expr::Variable { name: name.clone(),
                                                       position }),
        Token::Identifier(name) => parse_identifier_or_function(tokens, name, position),
        Token::LParen => parse_grouping(tokens, position),
        tok => Err(unexpected(tok, position)),
    }
}

/// Parses what follows a bare identifier.
///
/// An identifier immediately followed by `(` is a function call and must
/// name a registered function; the comparison ignores case. Any other
/// identifier is a property reference.
///
/// # Parameters
/// - `tokens`: Token iterator positioned just after the identifier.
/// - `name`: The identifier.
/// - `position`: Where the identifier starts.
///
/// # Returns
/// An [`Expr::FunctionCall`] or an [`Expr::Property`].
///
/// # Errors
/// - `UnknownFunction` if a called identifier is not in the registry.
/// - Any error from parsing the arguments.
fn parse_identifier_or_function<'a, I>(tokens: &mut Peekable<I>,
                                       name: &str,
                                       position: Position)
                                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let Some((Token::LParen, opened)) = tokens.peek() else {
        return Ok(Expr::Property { name: name.to_string(),
                                   position });
    };
    let opened = *opened;

    let function =
        Function::lookup(name).ok_or_else(|| ParseError::UnknownFunction { name: name.to_string(),
                                                                           position })?;
    tokens.next();
    let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, opened)?;

    Ok(Expr::FunctionCall { function,
                            arguments,
                            position })
}

/// Parses a parenthesized expression.
///
/// Grammar: `"(" expression ")"`
///
/// # Parameters
/// - `tokens`: Token iterator positioned just after `(`.
/// - `opened`: Where the `(` was found.
///
/// # Errors
/// `ExpectedClosingParen` pointing at the `(` if the group is not closed.
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>, opened: Position) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let expr = parse_expression(tokens)?;
    match tokens.next() {
        Some((Token::RParen, _)) => Ok(expr),
        Some((Token::End, _)) | None => Err(ParseError::ExpectedClosingParen { position: opened }),
        Some((tok, position)) => Err(unexpected(tok, *position)),
    }
}
