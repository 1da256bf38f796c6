/// Lexing and parsing errors.
///
/// Defines all error types that can occur while turning equation text into a
/// syntax tree: malformed tokens, unterminated quotes, unknown functions and
/// grammar violations. Every variant carries the source position.
pub mod parse_error;
/// Argument-binding errors.
///
/// Raised once per equation, before any data is touched, when a function or
/// operator receives the wrong number of arguments, arguments of the wrong
/// kind or shape, or a name the catalogue does not know.
pub mod bind_error;
/// Evaluation errors.
///
/// Contains the failures that can only be detected against a concrete data
/// grid: a referenced column that is missing, or a cross-row lookup that
/// matches no row.
pub mod eval_error;

pub use bind_error::BindError;
pub use eval_error::EvalError;
pub use parse_error::ParseError;

/// Any error produced while compiling or evaluating an equation.
///
/// The three kinds occur in strict pipeline order and each one aborts the
/// equation entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The equation text is not well formed.
    Parse(ParseError),
    /// The equation is well formed but its arguments do not fit their slots.
    Bind(BindError),
    /// The equation could not be applied to the data grid.
    Eval(EvalError),
}

impl From<ParseError> for EngineError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<BindError> for EngineError {
    fn from(error: BindError) -> Self {
        Self::Bind(error)
    }
}

impl From<EvalError> for EngineError {
    fn from(error: EvalError) -> Self {
        Self::Eval(error)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Bind(e) => write!(f, "{e}"),
            Self::Eval(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Bind(e) => Some(e),
            Self::Eval(e) => Some(e),
        }
    }
}
