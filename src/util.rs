/// Numeric conversion and formatting helpers.
///
/// This module provides the widening conversions used when integer cells take
/// part in real-valued arithmetic, and the canonical printed form of numeric
/// literals that derived column names are built from.
pub mod num;
