use std::collections::BTreeMap;

use crate::interpreter::value::ValueKind;

/// Whether a variable names a benchmark input or a measured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableClass {
    /// An input of the benchmark run, such as `'PE Count'`.
    Parameter,
    /// A measured output, such as `'Application Time'`.
    Result,
}

/// What the catalogue knows about one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableEntry {
    /// Parameter or result.
    pub class: VariableClass,
    /// The kind every cell of the variable's column holds.
    pub kind:  ValueKind,
}

/// Metadata fields every result set carries, as `(identifier, column)`.
const METADATA_FIELDS: [(&str, &str); 6] = [("Application", "application"),
                                            ("Compiler", "compiler"),
                                            ("MPI", "mpi"),
                                            ("Machine", "machine"),
                                            ("OperatingSystem", "operatingSystem"),
                                            ("Processor", "processor")];

/// The names an equation may refer to.
///
/// Quoted names in an equation resolve against the variables; bare
/// identifiers resolve against the properties. The catalogue is supplied by
/// the host once per result set and is only read while binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    variables:  BTreeMap<String, VariableEntry>,
    properties: BTreeMap<String, String>,
}

impl Catalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalogue holding the standard metadata fields
    /// (`Application`, `Compiler`, `MPI`, `Machine`, `OperatingSystem`,
    /// `Processor`) and no variables.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::catalogue::Catalogue;
    ///
    /// let catalogue = Catalogue::with_metadata_fields();
    ///
    /// assert_eq!(catalogue.property("OperatingSystem"), Some("operatingSystem"));
    /// assert_eq!(catalogue.property("mpi"), Some("mpi"));
    /// ```
    #[must_use]
    pub fn with_metadata_fields() -> Self {
        METADATA_FIELDS.iter()
                       .fold(Self::new(), |catalogue, (identifier, column)| {
                           catalogue.with_property(*identifier, *column)
                       })
    }

    /// Adds a variable, consuming and returning `self`.
    #[must_use]
    pub fn with_variable(mut self,
                         name: impl Into<String>,
                         class: VariableClass,
                         kind: ValueKind)
                         -> Self {
        self.insert_variable(name, class, kind);
        self
    }

    /// Adds a property, consuming and returning `self`.
    #[must_use]
    pub fn with_property(mut self, identifier: impl Into<String>, column: impl Into<String>) -> Self {
        self.insert_property(identifier, column);
        self
    }

    /// Adds or replaces a variable.
    pub fn insert_variable(&mut self, name: impl Into<String>, class: VariableClass, kind: ValueKind) {
        self.variables.insert(name.into(), VariableEntry { class, kind });
    }

    /// Adds or replaces a property mapping an identifier to a grid column.
    pub fn insert_property(&mut self, identifier: impl Into<String>, column: impl Into<String>) {
        self.properties.insert(identifier.into(), column.into());
    }

    /// Looks up a variable by its quoted name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableEntry> {
        self.variables.get(name)
    }

    /// Looks up the grid column of a property, by identifier or by column
    /// name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .or_else(|| self.properties.values().find(|column| *column == name))
            .map(String::as_str)
    }

    /// Iterates the variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &VariableEntry)> {
        self.variables.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Iterates the properties as `(identifier, column)` in identifier order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(id, column)| (id.as_str(), column.as_str()))
    }
}
