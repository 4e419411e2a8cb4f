//! Float comparisons for grid offsets.
//!
//! Shift grids store offsets of a few arc-seconds or less, so the default
//! tolerance is far tighter than a general-purpose epsilon.

/// Default absolute tolerance for offset comparisons
pub const DEFAULT_EPSILON: f64 = 1e-12;

fn within(actual: f64, expected: f64, epsilon: f64) -> bool {
    // NaN never matches, not even another NaN
    (actual - expected).abs() <= epsilon
}

/// Assert that an offset is within `epsilon` (default [`DEFAULT_EPSILON`]) of
/// the expected value.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    assert!(
        within(actual, expected, epsilon),
        "offset {actual:e} differs from {expected:e} by {:e} (tolerance {epsilon:e})",
        (actual - expected).abs()
    );
}

/// Assert that every shift dimension of an offset vector matches.
///
/// # Panics
///
/// Panics on a dimension count mismatch or on the first dimension outside
/// the tolerance.
pub fn assert_array_approx_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {} shift dimensions, got {}",
        expected.len(),
        actual.len()
    );

    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    if let Some(dim) = (0..actual.len()).find(|&d| !within(actual[d], expected[d], epsilon)) {
        panic!(
            "dimension {dim}: offset {:e} differs from {:e} (tolerance {epsilon:e}); \
             actual = {actual:?}, expected = {expected:?}",
            actual[dim], expected[dim]
        );
    }
}

/// Assert that `min <= actual <= max`.
pub fn assert_in_range(actual: f64, min: f64, max: f64) {
    assert!(
        (min..=max).contains(&actual),
        "offset {actual:e} outside [{min:e}, {max:e}]"
    );
}
