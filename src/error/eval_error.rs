#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while evaluating a bound equation
/// against a data grid.
pub enum EvalError {
    /// A variable or property column the grid does not provide.
    MissingColumn {
        /// The column name.
        column: String,
        /// Description of the node that referenced it.
        node:   String,
    },
    /// A `find` whose property never equals the match constant.
    NoMatchingRow {
        /// The property column that was scanned.
        property: String,
        /// The printed match constant.
        value:    String,
        /// Description of the `find` node.
        node:     String,
    },
    /// A derived variable named after a column it did not write.
    ColumnExists {
        /// The column name.
        column: String,
    },
    /// A named derived variable that has not been defined.
    UnknownDerivedData {
        /// The requested name.
        name: String,
    },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { column, node } => {
                write!(f, "Error in {node}: Column '{column}' is missing from the data.")
            },
            Self::NoMatchingRow { property,
                                  value,
                                  node, } => write!(f,
                                                    "Error in {node}: No row has {property} equal to {value}."),
            Self::ColumnExists { column } => {
                write!(f, "Error: Column '{column}' already exists and was not derived here.")
            },
            Self::UnknownDerivedData { name } => {
                write!(f, "Error: No derived data named '{name}' is defined.")
            },
        }
    }
}

impl std::error::Error for EvalError {}
