use std::iter::Peekable;

use crate::{
    ast::Position,
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses a comma-separated list of items until a closing token.
///
/// It repeatedly calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := [item ("," item)*]`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list.
/// - `opened`: Where the list was opened, reported if it is never closed.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the input ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    opened: Position)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((Token::End, _)) | None => {
                return Err(ParseError::ExpectedClosingParen { position: opened });
            },
            Some((tok, position)) => {
                return Err(ParseError::UnexpectedToken { token:    tok.to_string(),
                                                         position: *position, });
            },
        }
    }
    Ok(items)
}

/// Builds the error for a token that cannot appear where it was found.
///
/// Running into [`Token::End`] is reported as an unexpected end of input.
pub(in crate::interpreter::parser) fn unexpected(token: &Token, position: Position) -> ParseError {
    match token {
        Token::End => ParseError::UnexpectedEndOfInput { position },
        _ => ParseError::UnexpectedToken { token: token.to_string(),
                                           position },
    }
}
