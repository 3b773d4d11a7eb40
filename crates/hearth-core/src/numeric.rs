//! Coercion helpers that keep NaN and infinities out of every sum.

/// Tolerance for treating two money or percentage figures as equal.
pub const EPSILON: f64 = 1e-9;

/// Finite and non-negative.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Coerces anything that is not a finite, non-negative number to zero.
pub fn safe_amount(value: f64) -> f64 {
    if is_valid_amount(value) {
        value
    } else {
        0.0
    }
}

/// Coerces non-finite values to zero, keeping the sign.
pub fn safe_number(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// A guarded amount clamped to `0..=100`.
pub fn safe_percent(value: f64) -> f64 {
    safe_amount(value).min(100.0)
}

pub fn safe_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().map(safe_amount).sum()
}

/// Rounds to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (safe_number(value) * 100.0).round() / 100.0
}
