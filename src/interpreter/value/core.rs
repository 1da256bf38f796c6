use std::fmt;

use crate::interpreter::value::{
    datum::{Datum, ValueKind},
    rank::{ErrorKind, Rank},
};

/// A typed, metadata-bearing cell of a data grid.
///
/// Besides its magnitude a value carries where it came from: the variable
/// name, the process rank, an optional uncertainty and the sample counts of
/// the measurement. Arithmetic never touches any of that; it only replaces
/// the magnitude (see [`Value::update_datum`]) so derived metrics stay
/// traceable to the measurements they were computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    /// The name of the variable the value was recorded for.
    pub name:        String,
    /// The magnitude.
    pub datum:       Datum,
    /// The uncertainty of the magnitude, of the same kind.
    pub error:       Option<Datum>,
    /// How the uncertainty was measured.
    pub error_kind:  Option<ErrorKind>,
    /// The process rank the value belongs to.
    pub rank:        Rank,
    /// The number of samples the value summarises.
    pub count:       Option<u64>,
    /// The number of pauses recorded while sampling.
    pub pause_count: Option<u64>,
}

impl Value {
    /// Creates a value with no error or sample metadata.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::{Rank, Value};
    ///
    /// let v = Value::new("Application Time", Rank::Process(0), 1.5);
    /// assert_eq!(v.real(), Some(1.5));
    /// ```
    pub fn new(name: impl Into<String>, rank: Rank, datum: impl Into<Datum>) -> Self {
        Self { name: name.into(),
               datum: datum.into(),
               error: None,
               error_kind: None,
               rank,
               count: None,
               pause_count: None }
    }

    /// Attaches an uncertainty.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<Datum>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Records how the uncertainty was measured.
    #[must_use]
    pub const fn with_error_kind(mut self, kind: ErrorKind) -> Self {
        self.error_kind = Some(kind);
        self
    }

    /// Records the sample count.
    #[must_use]
    pub const fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Records the pause count.
    #[must_use]
    pub const fn with_pause_count(mut self, pause_count: u64) -> Self {
        self.pause_count = Some(pause_count);
        self
    }

    /// Returns the kind of the magnitude.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.datum.kind()
    }

    /// Returns the magnitude widened to `f64`, or `None` for text.
    #[must_use]
    pub const fn real(&self) -> Option<f64> {
        self.datum.as_real()
    }

    /// Returns the uncertainty widened to `f64`, if there is a numeric one.
    #[must_use]
    pub fn error_real(&self) -> Option<f64> {
        self.error.as_ref().and_then(Datum::as_real)
    }

    /// Widens an integer value, and its error, to reals.
    ///
    /// Real values are returned unchanged; text values have no numeric form
    /// and yield `None`.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::{Datum, Rank, Value};
    ///
    /// let v = Value::new("PE Count", Rank::Unknown, 4_i64).with_error(1_i64);
    /// let r = v.to_real().unwrap();
    ///
    /// assert_eq!(r.datum, Datum::from(4.0));
    /// assert_eq!(r.error, Some(Datum::from(1.0)));
    /// ```
    #[must_use]
    pub fn to_real(&self) -> Option<Self> {
        match self.datum {
            Datum::Real(_) => Some(self.clone()),
            Datum::Integer(_) => {
                let value = self.real()?;
                Some(self.update_real(value, self.error_real()))
            },
            Datum::Text(_) => None,
        }
    }

    /// Returns a copy with only the magnitude replaced.
    ///
    /// Name, rank, error, error kind and counts are kept.
    #[must_use]
    pub fn update_datum(&self, datum: impl Into<Datum>) -> Self {
        Self { datum: datum.into(),
               ..self.clone() }
    }

    /// Returns a copy with the magnitude and error replaced by reals.
    #[must_use]
    pub fn update_real(&self, value: f64, error: Option<f64>) -> Self {
        Self { datum: value.into(),
               error: error.map(Datum::from),
               ..self.clone() }
    }

    /// Returns a copy recorded under a different variable name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..self.clone() }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.datum)?;
        if let Some(error) = &self.error {
            write!(f, " ± {error}")?;
        }
        Ok(())
    }
}
