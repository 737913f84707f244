//! Moving average, optionally weighted.
//!
//! Unweighted: arithmetic mean of the trailing window.
//! Weighted: dot product of the weights against the trailing window in
//! chronological order (weights[0] applies to the oldest day).
//! First `window - 1` days are NaN; so is any window touching a NaN price.

use crate::domain::PriceMatrix;

use super::IndicatorError;

/// Compute the `window`-day moving average of every stock.
pub fn moving_average(
    prices: &PriceMatrix,
    window: usize,
    weights: Option<&[f64]>,
) -> Result<PriceMatrix, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::ZeroWindow);
    }
    if let Some(w) = weights {
        if w.len() != window {
            return Err(IndicatorError::WeightLength {
                expected: window,
                got: w.len(),
            });
        }
    }

    let days = prices.n_days();
    let stocks = prices.n_stocks();
    let mut out = PriceMatrix::undefined(days, stocks);

    for stock in 0..stocks {
        for day in (window - 1)..days {
            let start = day + 1 - window;
            let mut nan_in_window = false;
            let mut acc = 0.0;
            for offset in 0..window {
                let price = prices.get(start + offset, stock);
                if price.is_nan() {
                    nan_in_window = true;
                    break;
                }
                acc += match weights {
                    Some(w) => w[offset] * price,
                    None => price,
                };
            }
            if !nan_in_window {
                let value = match weights {
                    Some(_) => acc,
                    None => acc / window as f64,
                };
                out.set(day, stock, value);
            }
        }
    }

    Ok(out)
}
