use std::fmt;

use logos::Logos;
use tracing::instrument;

use crate::{ast::Position, error::ParseError, interpreter::parser::core::ParseResult};

/// Represents a lexical token in an equation.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.0` or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Double-quoted string literals, such as `"MachineC"`.
    #[regex(r#""[^"\r\n]*""#, |lex| unquote(lex.slice()))]
    Str(String),
    /// Single-quoted names, such as `'Application Time'`.
    #[regex(r"'[^'\r\n]*'", |lex| unquote(lex.slice()))]
    QuotedName(String),
    /// Identifier tokens; function names such as `avg` or metadata fields
    /// such as `Machine`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,

    /// A `"` with no closing quote on the same line.
    #[regex(r#""[^"\r\n]*"#)]
    UnterminatedString,
    /// A `'` with no closing quote on the same line.
    #[regex(r"'[^'\r\n]*")]
    UnterminatedName,
    /// Numbers with a second decimal point or an exponent without digits.
    #[regex(r"[0-9]*\.[0-9]+\.[0-9.]*")]
    #[regex(r"[0-9]+(\.[0-9]+)?[eE][+-]?")]
    MalformedNumber,
    /// Line breaks, in Unix, Windows or old Mac style.
    #[regex(r"\r\n|\r|\n", |lex| {
        lex.extras.line      += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\f]+", logos::skip)]
    Ignored,
    /// Marks the end of the token stream. Never produced by the lexer itself;
    /// [`tokenize`] appends it so the parser can report where input ended.
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(r) => write!(f, "number {r:?}"),
            Self::Integer(i) => write!(f, "number {i}"),
            Self::Str(s) => write!(f, "string \"{s}\""),
            Self::QuotedName(s) => write!(f, "name '{s}'"),
            Self::Identifier(s) => write!(f, "identifier {s}"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::UnterminatedString | Self::UnterminatedName => f.write_str("unterminated quote"),
            Self::MalformedNumber => f.write_str("malformed number"),
            Self::NewLine | Self::Ignored => f.write_str("whitespace"),
            Self::End => f.write_str("end of input"),
        }
    }
}

/// Errors raised from inside token callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexError {
    /// No token starts with the current character.
    #[default]
    UnexpectedCharacter,
    /// A literal that matched a numeric pattern but does not fit its type.
    InvalidNumber,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset where it starts, so that every
/// token can be given a line and column.
pub struct LexerExtras {
    /// The current line number in the equation.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

impl LexerExtras {
    fn position(&self, source: &str, offset: usize) -> Position {
        let column = source.get(self.line_start..offset)
                           .map_or(1, |prefix| prefix.chars().count() + 1);
        Position::new(self.line, column)
    }
}

/// Splits an equation into tokens paired with their source positions.
///
/// The returned stream always ends with [`Token::End`].
///
/// # Errors
/// Returns a `ParseError` naming the offending text and its position when a
/// character starts no token, a quote is never closed, or a number is
/// malformed.
///
/// # Example
/// ```
/// use derived_metrics::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("avg('Application Time')").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|(t, _)| t).collect();
///
/// assert_eq!(kinds,
///            vec![Token::Identifier("avg".to_string()),
///                 Token::LParen,
///                 Token::QuotedName("Application Time".to_string()),
///                 Token::RParen,
///                 Token::End]);
/// ```
#[instrument(name = "engine::lexer::tokenize", level = "trace")]
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, Position)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let position = lexer.extras.position(source, lexer.span().start);
        match token {
            Ok(Token::UnterminatedString) => {
                return Err(ParseError::UnterminatedString { text: lexer.slice().to_string(),
                                                            position });
            },
            Ok(Token::UnterminatedName) => {
                return Err(ParseError::UnterminatedName { text: lexer.slice().to_string(),
                                                          position });
            },
            Ok(Token::MalformedNumber) | Err(LexError::InvalidNumber) => {
                return Err(ParseError::InvalidNumber { literal: lexer.slice().to_string(),
                                                       position });
            },
            Ok(tok) => tokens.push((tok, position)),
            Err(LexError::UnexpectedCharacter) => {
                let character = lexer.slice().chars().next().unwrap_or_default();
                return Err(ParseError::UnexpectedCharacter { character, position });
            },
        }
    }

    let end = lexer.extras.position(source, source.len());
    tokens.push((Token::End, end));
    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Result<f64, LexError> {
    lex.slice().parse().map_err(|_| LexError::InvalidNumber)
}

/// Parses an integer literal from the current token slice.
///
/// Literals that overflow `i64` are reported as invalid numbers rather than
/// silently widened.
fn parse_integer(lex: &logos::Lexer<Token>) -> Result<i64, LexError> {
    lex.slice().parse().map_err(|_| LexError::InvalidNumber)
}

/// Strips the surrounding quote characters from a quoted token.
fn unquote(slice: &str) -> String {
    slice[1..slice.len() - 1].to_string()
}
