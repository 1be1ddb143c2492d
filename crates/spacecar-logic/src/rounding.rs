//! Decimal rounding shared by the models.
//!
//! Reported values are rounded half-to-even.

/// Round `value` to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Shorthand for three-decimal rounding used by scores and fuel.
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}
