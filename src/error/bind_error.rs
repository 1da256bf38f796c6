use crate::{ast::Position, interpreter::value::KindSet};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while binding arguments to functions
/// and operators.
pub enum BindError {
    /// The wrong number of arguments was supplied.
    ArgumentCountMismatch {
        /// The function or operator name.
        function: String,
        /// The declared arity.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// Where the call was written.
        position: Position,
    },
    /// An argument may return a kind its slot does not accept.
    ArgumentTypeMismatch {
        /// The function or operator name.
        function: String,
        /// The 1-based argument slot.
        slot:     usize,
        /// The kinds the slot accepts.
        expected: KindSet,
        /// The kinds the argument may return.
        found:    KindSet,
        /// Where the call was written.
        position: Position,
    },
    /// An argument is not the kind of node its slot requires.
    ArgumentShapeMismatch {
        /// The function name.
        function: String,
        /// The 1-based argument slot.
        slot:     usize,
        /// What the slot requires, e.g. "a constant".
        expected: &'static str,
        /// Where the call was written.
        position: Position,
    },
    /// Two arguments that must be compared share no comparable kind.
    IncomparableArguments {
        /// The function name.
        function: String,
        /// The kinds of the left argument.
        left:     KindSet,
        /// The kinds of the right argument.
        right:    KindSet,
        /// Where the call was written.
        position: Position,
    },
    /// A quoted name the variable catalogue does not contain.
    UnknownVariable {
        /// The quoted name.
        name:     String,
        /// Where the name was written.
        position: Position,
    },
    /// A bare identifier the metadata catalogue does not contain.
    UnknownProperty {
        /// The identifier.
        name:     String,
        /// Where the identifier was written.
        position: Position,
    },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArgumentCountMismatch { function,
                                          expected,
                                          found,
                                          position, } => write!(f,
                                                                "Error at {position}: Function {function} expects {expected} arguments, received {found}."),
            Self::ArgumentTypeMismatch { function,
                                         slot,
                                         expected,
                                         found,
                                         position, } => write!(f,
                                                               "Error at {position}: Function {function} expects argument number {slot} to be of types {expected}, received argument of type {found}."),
            Self::ArgumentShapeMismatch { function,
                                          slot,
                                          expected,
                                          position, } => write!(f,
                                                                "Error at {position}: Argument number {slot} of {function} must be {expected}."),
            Self::IncomparableArguments { function,
                                          left,
                                          right,
                                          position, } => write!(f,
                                                                "Error at {position}: Function {function} cannot compare {left} with {right}."),
            Self::UnknownVariable { name, position } => {
                write!(f, "Error at {position}: Unknown variable '{name}'.")
            },
            Self::UnknownProperty { name, position } => {
                write!(f, "Error at {position}: Unknown property '{name}'.")
            },
        }
    }
}

impl std::error::Error for BindError {}
