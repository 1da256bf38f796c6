use std::collections::BTreeMap;

use crate::interpreter::value::Value;

/// The tabular data an equation is evaluated against.
///
/// Rows are addressed by their insertion index. A cell is absent when its
/// row has no value for the column. This trait is the entire contract a host
/// has to satisfy; [`Table`] is the in-crate implementation.
pub trait DataGrid {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Whether the grid has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `column` is declared.
    fn has_column(&self, column: &str) -> bool;

    /// The cell of `row` in `column`, if present.
    fn value(&self, row: usize, column: &str) -> Option<&Value>;

    /// Declares `column` if it is new and writes one cell per row.
    ///
    /// Writing a column that already exists replaces its cells. Rows past
    /// the end of `values` are left absent.
    fn put_column(&mut self, column: &str, values: Vec<Option<Value>>);
}

/// One row of a [`Table`]: its present cells by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, Value>,
}

impl Row {
    /// Creates a row with no cells.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell, consuming and returning `self`.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.cells.insert(column.into(), value);
        self
    }

    /// The cell in `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Sets or clears the cell in `column`.
    pub fn set(&mut self, column: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.cells.insert(column.to_string(), value);
            },
            None => {
                self.cells.remove(column);
            },
        }
    }

    /// Iterates the present cells in column-name order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(column, value)| (column.as_str(), value))
    }
}

/// An ordered result set: declared columns plus rows.
///
/// Every row exposes every declared column; a row without a cell for a
/// declared column reads as absent.
///
/// ## Example
/// ```
/// use derived_metrics::interpreter::{
///     grid::{DataGrid, Row, Table},
///     value::{Rank, Value},
/// };
///
/// let mut table = Table::with_columns(["time"]);
/// table.push_row(Row::new().with("time", Value::new("time", Rank::AllRanks, 2.5)));
/// table.push_row(Row::new());
///
/// assert_eq!(table.len(), 2);
/// assert!(table.has_column("time"));
/// assert_eq!(table.value(1, "time"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows:    Vec<Row>,
}

impl Table {
    /// Creates an empty table with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table declaring `columns` in order.
    #[must_use]
    pub fn with_columns<I, S>(columns: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let mut table = Self::new();
        for column in columns {
            table.declare_column(column);
        }
        table
    }

    /// Declares `column` unless it already is.
    pub fn declare_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Appends a row, declaring any of its columns that are new.
    pub fn push_row(&mut self, row: Row) {
        let new_columns: Vec<String> = row.cells()
                                          .map(|(column, _)| column.to_string())
                                          .filter(|column| !self.columns.contains(column))
                                          .collect();
        self.columns.extend(new_columns);
        self.rows.push(row);
    }

    /// The rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The declared columns in declaration order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Every row's cell in `column`.
    #[must_use]
    pub fn column(&self, column: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|row| row.get(column)).collect()
    }
}

impl DataGrid for Table {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    fn put_column(&mut self, column: &str, values: Vec<Option<Value>>) {
        self.declare_column(column);
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.set(column, values.next().flatten());
        }
    }
}
