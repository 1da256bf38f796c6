use std::fmt;

use crate::interpreter::{
    evaluator::function::transform,
    value::{KindSet, Value},
};

/// Type alias for per-row kernels.
///
/// A kernel receives the present cell of every argument for one row, in slot
/// order, and returns the derived cell. Returning `None` leaves the derived
/// cell absent, which is what happens when a cell does not hold the kind its
/// column was declared with.
pub type RowKernel = fn(&[&Value]) -> Option<Value>;

/// What kind of node an argument slot requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Any node.
    Any,
    /// A variable or a property reference.
    Column,
    /// A literal constant.
    Constant,
}

impl Shape {
    /// Describes the shape for error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Any => "any expression",
            Self::Column => "a variable or property",
            Self::Constant => "a constant",
        }
    }
}

/// One argument slot of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Kinds the argument may return.
    pub kinds: KindSet,
    /// Kind of node the argument must be.
    pub shape: Shape,
}

impl Param {
    /// A slot accepting `kinds` from any node.
    #[must_use]
    pub const fn any(kinds: KindSet) -> Self {
        Self { kinds,
               shape: Shape::Any }
    }

    /// A slot accepting `kinds` with the given node shape.
    #[must_use]
    pub const fn shaped(kinds: KindSet, shape: Shape) -> Self {
        Self { kinds, shape }
    }
}

/// The kinds a function returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    /// Always the same kinds.
    Fixed(KindSet),
    /// Whatever its arguments may return.
    Arguments,
}

/// Declared arity, slot types and result of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Argument slots, in order. Arity is their count.
    pub params:     &'static [Param],
    /// Result kinds.
    pub returns:    Returns,
    /// Whether the first two arguments must share a comparable kind.
    pub comparable: bool,
}

impl Signature {
    /// Number of arguments the function takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Whole-column reductions used by aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Arithmetic mean of values and of errors.
    Mean,
    /// Smallest value and its row's error.
    Min,
    /// Largest value and its row's error.
    Max,
}

/// How a function derives its column.
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Each row is computed from the same row's arguments.
    PerRow(RowKernel),
    /// One scalar reduced over all rows, written to every row.
    Aggregate(Reduction),
    /// A value from the first row whose property matches a constant, written
    /// to every row.
    Lookup,
    /// `1.0` where both arguments match within a row, `0.0` otherwise.
    Conditional,
    /// The first argument where present, else the second.
    Coalesce,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerRow(_) => f.write_str("PerRow"),
            Self::Aggregate(r) => write!(f, "Aggregate({r:?})"),
            Self::Lookup => f.write_str("Lookup"),
            Self::Conditional => f.write_str("Conditional"),
            Self::Coalesce => f.write_str("Coalesce"),
        }
    }
}

/// A registry entry: everything the binder needs to build a function node and
/// everything the evaluator needs to run it.
#[derive(Debug)]
pub struct FunctionDef {
    /// Lower-case name as written in equations and in column names.
    pub name:      &'static str,
    /// The function this entry defines.
    pub function:  Function,
    /// Arity, slot kinds and shapes, and result kinds.
    pub signature: Signature,
    /// Evaluation strategy.
    pub strategy:  Strategy,
}

const NUMERIC: Param = Param::any(KindSet::NUMERIC);
const ANYTHING: Param = Param::any(KindSet::ANY);

/// Defines the built-in functions by generating the `Function` enum and its
/// definition table.
///
/// Each entry provides:
/// - the enum variant and its equation name,
/// - its parameter slots,
/// - its return kinds and whether its arguments must be comparable,
/// - its evaluation strategy.
///
/// Variants and table rows are generated in the same order, so a variant's
/// discriminant is its index in `FUNCTION_TABLE`.
macro_rules! builtin_functions {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $name:literal {
                params: [$($param:expr),* $(,)?],
                returns: $returns:expr,
                comparable: $comparable:expr,
                strategy: $strategy:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// A function callable from an equation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Function {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        static FUNCTION_TABLE: &[FunctionDef] = &[
            $(
                FunctionDef { name:      $name,
                              function:  Function::$variant,
                              signature: Signature { params:     &[$($param),*],
                                                     returns:    $returns,
                                                     comparable: $comparable, },
                              strategy:  $strategy, },
            )*
        ];

        /// Names of all built-in functions, in registry order.
        pub const FUNCTION_NAMES: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    /// `abs(x)`: absolute value; integers stay integral.
    Abs => "abs" {
        params: [NUMERIC],
        returns: Returns::Arguments,
        comparable: false,
        strategy: Strategy::PerRow(transform::abs),
    },
    /// `avg(x)`: mean over all rows.
    Avg => "avg" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::Aggregate(Reduction::Mean),
    },
    /// `cos(x)`, in radians.
    Cos => "cos" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::PerRow(transform::cos),
    },
    /// `find(x, property, constant)`: `x` from the first row whose
    /// `property` equals `constant`.
    Find => "find" {
        params: [NUMERIC,
                 Param::shaped(KindSet::ANY, Shape::Column),
                 Param::shaped(KindSet::ANY, Shape::Constant)],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::Lookup,
    },
    /// `ifeq(x, y)`: `1.0` where `x` equals `y`, else `0.0`.
    Ifeq => "ifeq" {
        params: [ANYTHING, ANYTHING],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: true,
        strategy: Strategy::Conditional,
    },
    /// `log(x)`: natural logarithm.
    Log => "log" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::PerRow(transform::log),
    },
    /// `max(x)`: largest value over all rows.
    Max => "max" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::Aggregate(Reduction::Max),
    },
    /// `min(x)`: smallest value over all rows.
    Min => "min" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::Aggregate(Reduction::Min),
    },
    /// `or(x, y)`: `x` where present, else `y`.
    Or => "or" {
        params: [ANYTHING, ANYTHING],
        returns: Returns::Arguments,
        comparable: false,
        strategy: Strategy::Coalesce,
    },
    /// `pow(x, y)`: `x` raised to `y`.
    Pow => "pow" {
        params: [NUMERIC, NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::PerRow(transform::pow),
    },
    /// `sin(x)`, in radians.
    Sin => "sin" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::PerRow(transform::sin),
    },
    /// `tan(x)`, in radians.
    Tan => "tan" {
        params: [NUMERIC],
        returns: Returns::Fixed(KindSet::REAL),
        comparable: false,
        strategy: Strategy::PerRow(transform::tan),
    },
}

impl Function {
    /// Resolves a function name, ignoring case.
    ///
    /// # Example
    /// ```
    /// use derived_metrics::interpreter::registry::Function;
    ///
    /// assert_eq!(Function::lookup("AVG"), Some(Function::Avg));
    /// assert_eq!(Function::lookup("median"), None);
    /// ```
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        FUNCTION_TABLE.iter()
                      .find(|def| def.name.eq_ignore_ascii_case(name))
                      .map(|def| def.function)
    }

    /// Gets the registry entry of `self`.
    #[must_use]
    pub fn definition(self) -> &'static FunctionDef {
        &FUNCTION_TABLE[self as usize]
    }

    /// Gets the lower-case name of `self`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Gets the signature of `self`.
    #[must_use]
    pub fn signature(self) -> &'static Signature {
        &self.definition().signature
    }

    /// Gets the evaluation strategy of `self`.
    #[must_use]
    pub fn strategy(self) -> Strategy {
        self.definition().strategy
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_finds_its_own_row() {
        for name in FUNCTION_NAMES {
            let function = Function::lookup(name).unwrap();
            assert_eq!(function.name(), *name);
            assert_eq!(function.definition().function, function);
        }
    }

    #[test]
    fn find_constrains_the_shape_of_its_last_two_slots() {
        let params = Function::Find.signature().params;

        assert_eq!(params.len(), 3);
        assert_eq!(params[0].shape, Shape::Any);
        assert_eq!(params[1].shape, Shape::Column);
        assert_eq!(params[2].shape, Shape::Constant);
    }

    #[test]
    fn only_ifeq_compares_its_arguments() {
        let comparing: Vec<_> = FUNCTION_NAMES.iter()
                                              .filter_map(|n| Function::lookup(n))
                                              .filter(|f| f.signature().comparable)
                                              .collect();
        assert_eq!(comparing, vec![Function::Ifeq]);
    }
}
