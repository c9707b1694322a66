//! Compact rendering of floating-point values.
//!
//! Values print with the fewest digits that still read back as the same
//! `f64`, laid out like C's `%g`: fixed notation for moderate exponents,
//! `d.ddde±XX` otherwise.

/// Exponents at or above this switch to scientific notation.
const MAX_FIXED_EXPONENT: i32 = 17;

/// Exponents below this switch to scientific notation.
const MIN_FIXED_EXPONENT: i32 = -4;

/// Render `value` in the compact general format.
///
/// ```
/// assert_eq!(tapkit::format::general(1.5), "1.5");
/// assert_eq!(tapkit::format::general(0.00001), "1e-05");
/// assert_eq!(tapkit::format::general(f64::NEG_INFINITY), "-inf");
/// ```
#[must_use]
pub fn general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e-7".
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{value}");
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{value}");
    };

    if (MIN_FIXED_EXPONENT..MAX_FIXED_EXPONENT).contains(&exponent) {
        format!("{value}")
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}
