/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Widens an `i64` to `f64`.
///
/// Integers whose magnitude exceeds [`MAX_SAFE_U64_INT`] are rounded to the
/// nearest representable value, the same way benchmark counters are widened
/// everywhere else in the engine.
///
/// ## Example
/// ```
/// use derived_metrics::util::num::i64_to_f64;
///
/// assert_eq!(i64_to_f64(-42), -42.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use derived_metrics::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, "too big!").unwrap(), 42.0);
///
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(error);
    }
    Ok(value as f64)
}

/// Converts a row count to `f64` for averaging.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Returns the canonical printed form of a real literal.
///
/// Reals always keep a fractional part (`2.0`, not `2`) so that a real
/// constant never shares a column name with the integer constant of the same
/// magnitude.
///
/// ## Example
/// ```
/// use derived_metrics::util::num::format_real;
///
/// assert_eq!(format_real(2.0), "2.0");
/// assert_eq!(format_real(1.234), "1.234");
/// assert_eq!(format_real(-0.5), "-0.5");
/// ```
#[must_use]
pub fn format_real(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reals_keep_their_fraction() {
        assert_eq!(format_real(6.0), "6.0");
        assert_eq!(format_real(0.25), "0.25");
        assert_ne!(format_real(1.0), 1.to_string());
    }

    #[test]
    fn checked_widening_rejects_unsafe_integers() {
        assert_eq!(i64_to_f64_checked(-7, ()), Ok(-7.0));
        assert!(i64_to_f64_checked(i64::MAX, ()).is_err());
    }
}
