//! Floating-point helpers used by grid compression.
//!
//! Grid values usually come from ASCII files where they were written with a
//! handful of decimal digits. Widening such an `f32` with a plain `as f64`
//! keeps the binary rounding error of the `f32` (e.g. `0.1f32 as f64` is
//! `0.10000000149011612`). [`float_to_double`] instead recovers the decimal
//! value the `f32` was parsed from.

/// Widen an `f32` to the `f64` nearest to the shortest decimal string that
/// round-trips to the same `f32`.
///
/// `0.1f32` becomes `0.1f64`, not `0.10000000149011612`. Infinities and NaN
/// are widened unchanged.
pub fn float_to_double(value: f32) -> f64 {
    if !value.is_finite() {
        return value as f64;
    }
    // Display for f32 emits the shortest representation that parses back to
    // the same bits, without exponent notation.
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or(value as f64)
}

/// Distance from `|value|` to the next larger representable `f32`.
///
/// Same contract as Java's `Math.ulp(float)`: `ulp(0) == f32::from_bits(1)`,
/// `ulp(±inf) == inf`, `ulp(NaN)` is NaN.
pub fn ulp(value: f32) -> f32 {
    if value.is_nan() {
        return f32::NAN;
    }
    let magnitude = value.abs();
    if magnitude.is_infinite() {
        return f32::INFINITY;
    }
    if magnitude == f32::MAX {
        // Gap below MAX, since there is nothing finite above it.
        return magnitude - f32::from_bits(magnitude.to_bits() - 1);
    }
    f32::from_bits(magnitude.to_bits() + 1) - magnitude
}

/// Bit-level equality for `f64`, so that NaN equals NaN and `0.0 != -0.0`.
pub(crate) fn same_bits(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}
