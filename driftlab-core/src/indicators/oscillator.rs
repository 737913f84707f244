//! Stochastic and RSI oscillators, both ranging over [0, 1].
//!
//! Stochastic: (price - window min) / (window max - window min).
//! A flat window (max == min) divides by zero and is left NaN — a
//! documented degeneracy, not an error.
//!
//! RSI: day-over-day differences within the trailing window; the averages
//! of the positive and of the absolute negative differences are taken
//! independently. No down days => 1, no up days => 0, otherwise
//! `1 - 1/(1 + avg_pos/avg_neg)`.

use crate::domain::PriceMatrix;
use serde::{Deserialize, Serialize};

use super::{moving_average, IndicatorError};

/// Which oscillator to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OscillatorKind {
    Stochastic,
    Rsi,
}

/// Compute the `window`-day oscillator of every stock.
///
/// `smoothing` applies an unweighted moving average of that period to the
/// oscillator series itself, extending the undefined prefix accordingly.
/// Smoothing never reintroduces a defined value once the base series has
/// gone undefined through a price failure.
pub fn oscillator(
    prices: &PriceMatrix,
    window: usize,
    kind: OscillatorKind,
    smoothing: Option<usize>,
) -> Result<PriceMatrix, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::ZeroWindow);
    }

    let days = prices.n_days();
    let stocks = prices.n_stocks();
    let mut out = PriceMatrix::undefined(days, stocks);

    for stock in 0..stocks {
        for day in (window - 1)..days {
            let start = day + 1 - window;
            let win: Vec<f64> = (start..=day).map(|d| prices.get(d, stock)).collect();
            if win.iter().any(|p| p.is_nan()) {
                continue;
            }
            let value = match kind {
                OscillatorKind::Stochastic => stochastic(&win),
                OscillatorKind::Rsi => rsi(&win),
            };
            out.set(day, stock, value);
        }
    }

    match smoothing {
        Some(period) => moving_average(&out, period, None),
        None => Ok(out),
    }
}

fn stochastic(window: &[f64]) -> f64 {
    let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = window.iter().copied().fold(f64::INFINITY, f64::min);
    if max == min {
        return f64::NAN;
    }
    (window[window.len() - 1] - min) / (max - min)
}

fn rsi(window: &[f64]) -> f64 {
    let mut pos_sum = 0.0;
    let mut pos_count = 0usize;
    let mut neg_sum = 0.0;
    let mut neg_count = 0usize;
    for pair in window.windows(2) {
        let diff = pair[1] - pair[0];
        if diff > 0.0 {
            pos_sum += diff;
            pos_count += 1;
        } else if diff < 0.0 {
            neg_sum += -diff;
            neg_count += 1;
        }
    }
    if neg_count == 0 {
        1.0
    } else if pos_count == 0 {
        0.0
    } else {
        let avg_pos = pos_sum / pos_count as f64;
        let avg_neg = neg_sum / neg_count as f64;
        1.0 - 1.0 / (1.0 + avg_pos / avg_neg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_prices, DEFAULT_EPSILON};

    #[test]
    fn stochastic_basic() {
        // Window [1, 2, 3]: (3 - 1) / (3 - 1) = 1 at the top of the range.
        let prices = make_prices(&[1.0, 2.0, 3.0, 2.0]);
        let osc = oscillator(&prices, 3, OscillatorKind::Stochastic, None).unwrap();
        assert!(osc.get(0, 0).is_nan());
        assert!(osc.get(1, 0).is_nan());
        assert_approx(osc.get(2, 0), 1.0, DEFAULT_EPSILON);
        // Window [2, 3, 2]: (2 - 2) / (3 - 2) = 0.
        assert_approx(osc.get(3, 0), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_flat_window_is_nan() {
        let prices = make_prices(&[5.0, 5.0, 5.0, 6.0]);
        let osc = oscillator(&prices, 3, OscillatorKind::Stochastic, None).unwrap();
        assert!(osc.get(2, 0).is_nan());
        assert!(!osc.get(3, 0).is_nan());
    }

    #[test]
    fn stochastic_in_unit_range() {
        let prices = make_prices(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0]);
        let osc = oscillator(&prices, 4, OscillatorKind::Stochastic, None).unwrap();
        for day in 3..10 {
            let v = osc.get(day, 0);
            assert!((0.0..=1.0).contains(&v), "day {day}: {v}");
        }
    }

    #[test]
    fn rsi_all_gains_is_one() {
        let prices = make_prices(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let osc = oscillator(&prices, 4, OscillatorKind::Rsi, None).unwrap();
        assert_approx(osc.get(3, 0), 1.0, DEFAULT_EPSILON);
        assert_approx(osc.get(4, 0), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let prices = make_prices(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        let osc = oscillator(&prices, 4, OscillatorKind::Rsi, None).unwrap();
        assert_approx(osc.get(3, 0), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_balanced_is_half() {
        // Diffs +1, -1, +1: avg_pos = 1, avg_neg = 1 => 1 - 1/2 = 0.5.
        let prices = make_prices(&[2.0, 3.0, 2.0, 3.0]);
        let osc = oscillator(&prices, 4, OscillatorKind::Rsi, None).unwrap();
        assert_approx(osc.get(3, 0), 0.5, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_in_unit_range() {
        let prices = make_prices(&[10.0, 10.5, 9.8, 11.0, 9.5, 11.5, 9.0, 12.0]);
        let osc = oscillator(&prices, 4, OscillatorKind::Rsi, None).unwrap();
        for day in 3..8 {
            let v = osc.get(day, 0);
            assert!((0.0..=1.0).contains(&v), "day {day}: {v}");
        }
    }

    #[test]
    fn rsi_flat_window_counts_as_no_down_days() {
        // All diffs are zero: no down days, so the value is 1.
        let prices = make_prices(&[5.0, 5.0, 5.0, 5.0]);
        let osc = oscillator(&prices, 3, OscillatorKind::Rsi, None).unwrap();
        assert_approx(osc.get(2, 0), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn failed_price_undefines_oscillator() {
        let mut prices = make_prices(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        prices.fail_from(3, 0);
        let osc = oscillator(&prices, 3, OscillatorKind::Stochastic, None).unwrap();
        assert!(!osc.get(2, 0).is_nan());
        for day in 3..6 {
            assert!(osc.get(day, 0).is_nan());
        }
    }

    #[test]
    fn smoothing_extends_undefined_prefix() {
        let prices = make_prices(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let osc = oscillator(&prices, 3, OscillatorKind::Rsi, Some(2)).unwrap();
        // Base defined from day 2; a 2-day smoothing needs days 2 and 3.
        assert!(osc.get(2, 0).is_nan());
        assert!(!osc.get(3, 0).is_nan());
    }

    #[test]
    fn smoothing_never_revives_failed_series() {
        let mut prices = make_prices(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        prices.fail_from(4, 0);
        let osc = oscillator(&prices, 3, OscillatorKind::Rsi, Some(2)).unwrap();
        for day in 4..8 {
            assert!(osc.get(day, 0).is_nan(), "day {day} must stay undefined");
        }
    }

    #[test]
    fn smoothing_of_zero_is_rejected() {
        let prices = make_prices(&[1.0, 2.0, 3.0]);
        assert_eq!(
            oscillator(&prices, 2, OscillatorKind::Rsi, Some(0)).unwrap_err(),
            IndicatorError::ZeroWindow
        );
    }

    #[test]
    fn rejects_zero_window() {
        let prices = make_prices(&[1.0, 2.0]);
        assert_eq!(
            oscillator(&prices, 0, OscillatorKind::Stochastic, None).unwrap_err(),
            IndicatorError::ZeroWindow
        );
    }
}
