//! Indicator computations over a price matrix.
//!
//! All indicators share the window convention: the first `window - 1` days
//! are undefined (NaN), and any trailing window that touches a failed price
//! yields NaN. Because price failure is absorbing, an indicator over a
//! failed stock is undefined permanently from the first touched day.
//! Indicator matrices are derived fresh from a price snapshot and are
//! read-only to the strategies.

pub mod moving_average;
pub mod oscillator;

pub use moving_average::moving_average;
pub use oscillator::{oscillator, OscillatorKind};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("window length must be >= 1")]
    ZeroWindow,
    #[error("weights must have exactly {expected} entries, got {got}")]
    WeightLength { expected: usize, got: usize },
}

/// Build a single-stock price matrix from a close series, for tests.
#[cfg(test)]
pub fn make_prices(closes: &[f64]) -> crate::domain::PriceMatrix {
    crate::domain::PriceMatrix::from_columns(&[closes.to_vec()])
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
