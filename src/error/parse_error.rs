use crate::ast::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// A character that does not start any token.
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Where the character was found.
        position:  Position,
    },
    /// A double-quoted string literal was never closed.
    UnterminatedString {
        /// The literal from its opening quote to the end of the line.
        text:     String,
        /// Where the opening quote was found.
        position: Position,
    },
    /// A single-quoted name was never closed.
    UnterminatedName {
        /// The name from its opening quote to the end of the line.
        text:     String,
        /// Where the opening quote was found.
        position: Position,
    },
    /// A numeric literal that cannot be represented.
    InvalidNumber {
        /// The literal as written.
        literal:  String,
        /// Where the literal starts.
        position: Position,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// Where the token was found.
        position: Position,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The position just past the last token.
        position: Position,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// Where the matching `(` was found.
        position: Position,
    },
    /// An identifier followed by `(` that names no known function.
    UnknownFunction {
        /// The identifier as written.
        name:     String,
        /// Where the identifier was found.
        position: Position,
    },
    /// Found extra tokens after the equation should have ended.
    UnexpectedTrailingTokens {
        /// The first extra token.
        token:    String,
        /// Where the extra token was found.
        position: Position,
    },
    /// The equation contains no tokens at all.
    EmptyEquation,
}

impl ParseError {
    /// Returns the source position the error refers to, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::UnexpectedCharacter { position, .. }
            | Self::UnterminatedString { position, .. }
            | Self::UnterminatedName { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position }
            | Self::ExpectedClosingParen { position }
            | Self::UnknownFunction { position, .. }
            | Self::UnexpectedTrailingTokens { position, .. } => Some(*position),
            Self::EmptyEquation => None,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { character, position } => {
                write!(f, "Error at {position}: Unexpected character '{character}'.")
            },
            Self::UnterminatedString { text, position } => {
                write!(f, "Error at {position}: Unterminated string literal {text}.")
            },
            Self::UnterminatedName { text, position } => {
                write!(f, "Error at {position}: Unterminated quoted name {text}.")
            },
            Self::InvalidNumber { literal, position } => {
                write!(f, "Error at {position}: Invalid numeric literal '{literal}'.")
            },
            Self::UnexpectedToken { token, position } => {
                write!(f, "Error at {position}: Unexpected token: {token}.")
            },
            Self::UnexpectedEndOfInput { position } => {
                write!(f, "Error at {position}: Unexpected end of input.")
            },
            Self::ExpectedClosingParen { position } => write!(f,
                                                              "Error at {position}: Expected closing parenthesis ')' but none found."),
            Self::UnknownFunction { name, position } => {
                write!(f, "Error at {position}: Unknown function '{name}'.")
            },
            Self::UnexpectedTrailingTokens { token, position } => write!(f,
                                                                         "Error at {position}: Extra tokens after expression. Check your input: {token}"),
            Self::EmptyEquation => write!(f, "Error: The equation is empty."),
        }
    }
}

impl std::error::Error for ParseError {}
