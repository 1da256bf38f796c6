use std::fmt;

use ordered_float::OrderedFloat;

use crate::util::num::{format_real, i64_to_f64, i64_to_f64_checked};

/// The magnitude held by a cell.
///
/// Reals are wrapped in [`OrderedFloat`] so that data (and therefore whole
/// values) are `Eq` and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datum {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit floating-point number.
    Real(OrderedFloat<f64>),
    /// A string, typically a metadata field such as a machine name.
    Text(String),
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Self::Real(OrderedFloat(value))
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Datum {
    /// Returns the kind of this datum.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::Text(_) => ValueKind::Text,
        }
    }

    /// Widens a numeric datum to `f64`. Text yields `None`.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::Datum;
    ///
    /// assert_eq!(Datum::from(3_i64).as_real(), Some(3.0));
    /// assert_eq!(Datum::from("MachineA").as_real(), None);
    /// ```
    #[must_use]
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(i64_to_f64(*i)),
            Self::Real(r) => Some(r.0),
            Self::Text(_) => None,
        }
    }

    /// Compares two data the way `find` and `ifeq` do.
    ///
    /// Numbers compare by magnitude regardless of integer/real kind, text
    /// compares exactly, and a number never equals a string.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::Datum;
    ///
    /// assert!(Datum::from(2_i64).matches(&Datum::from(2.0)));
    /// assert!(!Datum::from("2").matches(&Datum::from(2_i64)));
    /// ```
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.0 == b.0,
            (Self::Integer(i), Self::Real(r)) | (Self::Real(r), Self::Integer(i)) => {
                i64_to_f64_checked(*i, ()).is_ok_and(|i| i == r.0)
            },
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }

    /// The name of the column a constant with this datum is written to.
    ///
    /// Numbers use their printed form. Text keeps its double quotes, so a
    /// literal never shares a name with a variable or property column.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::Datum;
    ///
    /// assert_eq!(Datum::from(2.0).column_name(), "2.0");
    /// assert_eq!(Datum::from("Label").column_name(), "\"Label\"");
    /// ```
    #[must_use]
    pub fn column_name(&self) -> String {
        match self {
            Self::Text(s) => format!("\"{s}\""),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => f.write_str(&format_real(r.0)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The kind of a datum, as seen by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Integral numbers.
    Integer,
    /// Floating-point numbers.
    Real,
    /// Strings.
    Text,
}

impl ValueKind {
    const ALL: [Self; 3] = [Self::Integer, Self::Real, Self::Text];

    const fn bit(self) -> u8 {
        match self {
            Self::Integer => 0b001,
            Self::Real => 0b010,
            Self::Text => 0b100,
        }
    }

    /// The name used for constants of this kind and in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Real => "Real",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of value kinds.
///
/// Used both for what an argument slot accepts and for what a node may
/// return. A node fits a slot when every kind it may return is accepted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KindSet(u8);

impl KindSet {
    /// No kinds at all.
    pub const EMPTY: Self = Self(0);
    /// Integers only.
    pub const INTEGER: Self = Self(0b001);
    /// Reals only.
    pub const REAL: Self = Self(0b010);
    /// Text only.
    pub const TEXT: Self = Self(0b100);
    /// Integers and reals.
    pub const NUMERIC: Self = Self(0b011);
    /// Every kind.
    pub const ANY: Self = Self(0b111);

    /// The set containing exactly `kind`.
    #[must_use]
    pub const fn of(kind: ValueKind) -> Self {
        Self(kind.bit())
    }

    /// Whether `kind` is a member.
    #[must_use]
    pub const fn contains(self, kind: ValueKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Whether every member of `other` is also a member of `self`.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::KindSet;
    ///
    /// assert!(KindSet::NUMERIC.contains_all(KindSet::INTEGER));
    /// assert!(!KindSet::NUMERIC.contains_all(KindSet::ANY));
    /// ```
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        other.0 & !self.0 == 0
    }

    /// The members of either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The members of both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Whether the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the members in a fixed order.
    pub fn iter(self) -> impl Iterator<Item = ValueKind> {
        ValueKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

impl From<ValueKind> for KindSet {
    fn from(kind: ValueKind) -> Self {
        Self::of(kind)
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.iter().map(ValueKind::name).collect::<Vec<_>>();
        write!(f, "[{}]", names.join(", "))
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindSet{self}")
    }
}
