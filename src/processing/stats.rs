//! Per-group summary statistics.

use statrs::statistics::Statistics;

/// Mean and sample standard deviation of `values`.
///
/// The standard deviation uses the `n - 1` denominator. With fewer than two values it is `NaN`;
/// with no values both results are `NaN`.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    (values.iter().mean(), values.iter().std_dev())
}
