use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use crate::{
    Equation,
    error::{EngineError, EvalError},
    interpreter::{catalogue::Catalogue, grid::DataGrid},
};

/// User-named derived variables.
///
/// Each entry keeps the equation text the user wrote and its compiled form.
/// Applying an entry evaluates the equation and copies the derived column to
/// a column carrying the user's name. A set only ever overwrites columns it
/// wrote itself.
///
/// ## Example
/// ```
/// use derived_metrics::interpreter::{
///     catalogue::{Catalogue, VariableClass},
///     derived::DerivedDataSet,
///     grid::{DataGrid, Row, Table},
///     value::{Rank, Value, ValueKind},
/// };
///
/// let catalogue = Catalogue::new().with_variable("Time", VariableClass::Result, ValueKind::Real);
/// let mut table = Table::with_columns(["Time"]);
/// table.push_row(Row::new().with("Time", Value::new("Time", Rank::AllRanks, 8.0)));
///
/// let mut derived = DerivedDataSet::new();
/// derived.define("Half Time", "'Time' / 2", &catalogue).unwrap();
///
/// assert_eq!(derived.apply("Half Time", &mut table).unwrap(), "Half Time");
/// let cell = table.value(0, "Half Time").unwrap();
/// assert_eq!(cell.real(), Some(4.0));
/// assert_eq!(cell.name, "Half Time");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DerivedDataSet {
    definitions: BTreeMap<String, Equation>,
    /// Columns this set has written.
    applied:     BTreeSet<String>,
}

impl DerivedDataSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `equation` and stores it under `name`, replacing any previous
    /// definition.
    ///
    /// # Errors
    /// Parse or bind errors from compiling `equation`; the set is left
    /// unchanged.
    pub fn define(&mut self,
                  name: impl Into<String>,
                  equation: &str,
                  catalogue: &Catalogue)
                  -> Result<(), EngineError> {
        let compiled = Equation::compile(equation, catalogue)?;
        self.definitions.insert(name.into(), compiled);
        Ok(())
    }

    /// The equation text defined under `name`.
    #[must_use]
    pub fn equation(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(Equation::text)
    }

    /// The compiled equation defined under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Equation> {
        self.definitions.get(name)
    }

    /// Removes the definition under `name`, returning whether there was one.
    pub fn remove(&mut self, name: &str) -> bool {
        self.definitions.remove(name).is_some()
    }

    /// The defined names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Evaluates the equation defined under `name` against `grid` and copies
    /// the result to a column called `name`, whose cells are renamed to
    /// `name` as well.
    ///
    /// # Returns
    /// `name`, the column now holding the result.
    ///
    /// # Errors
    /// - `UnknownDerivedData` if nothing is defined under `name`.
    /// - `ColumnExists` if `grid` already has a column called `name` that
    ///   this set did not write. The grid is left untouched.
    /// - Any error from evaluating the equation.
    #[instrument(name = "engine::derived::apply", level = "debug", skip(self, grid))]
    pub fn apply<G>(&mut self, name: &str, grid: &mut G) -> Result<String, EngineError>
        where G: DataGrid + ?Sized
    {
        let equation =
            self.definitions
                .get(name)
                .ok_or_else(|| EvalError::UnknownDerivedData { name: name.to_string() })?;
        if grid.has_column(name) && !self.applied.contains(name) {
            return Err(EvalError::ColumnExists { column: name.to_string() }.into());
        }
        let column = equation.evaluate(grid)?;

        let values = (0..grid.len()).map(|row| grid.value(row, &column).map(|v| v.renamed(name)))
                                    .collect();
        grid.put_column(name, values);
        self.applied.insert(name.to_string());
        debug!(from = %column, to = name, "copied derived column");

        Ok(name.to_string())
    }
}
