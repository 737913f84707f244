//! Fast/slow moving-average crossover trading.
//!
//! A buy fires when the fast average crosses above the slow average
//! between consecutive days, a sell when it crosses below. Both averages
//! accept optional weight vectors. An optional cool-down suppresses
//! repeated signals of the same kind for a number of days after a trade.

use crate::domain::PriceMatrix;
use crate::engine::Trader;
use crate::indicators::moving_average;
use crate::ledger::LedgerStore;

use super::StrategyError;

#[allow(clippy::too_many_arguments)]
pub fn run(
    prices: &PriceMatrix,
    amount: f64,
    slow: usize,
    fast: usize,
    slow_weights: Option<&[f64]>,
    fast_weights: Option<&[f64]>,
    cool_down: usize,
    fees: f64,
    ledger: LedgerStore,
) -> Result<(), StrategyError> {
    let slow_ma = moving_average(prices, slow, slow_weights)?;
    let fast_ma = moving_average(prices, fast, fast_weights)?;

    let trader = Trader::new(prices, fees, ledger);
    let allocations = vec![amount; prices.n_stocks()];
    let mut portfolio = trader.create_portfolio(&allocations)?;

    // Day of the last trade of each kind, per stock, for cool-down.
    let mut last_buy: Vec<Option<usize>> = vec![None; prices.n_stocks()];
    let mut last_sell: Vec<Option<usize>> = vec![None; prices.n_stocks()];
    let last_day = prices.n_days() - 1;

    for day in slow..last_day {
        for stock in 0..prices.n_stocks() {
            let f_prev = fast_ma.get(day - 1, stock);
            let s_prev = slow_ma.get(day - 1, stock);
            let f_cur = fast_ma.get(day, stock);
            let s_cur = slow_ma.get(day, stock);
            if f_prev.is_nan() || s_prev.is_nan() || f_cur.is_nan() || s_cur.is_nan() {
                continue;
            }

            if f_prev < s_prev && f_cur > s_cur {
                if cooled(last_buy[stock], day, cool_down) {
                    trader.buy(day, stock, amount, &mut portfolio)?;
                    last_buy[stock] = Some(day);
                }
            } else if f_prev > s_prev && f_cur < s_cur {
                if cooled(last_sell[stock], day, cool_down) {
                    if portfolio.shares(stock) > 0 {
                        trader.sell(day, stock, &mut portfolio)?;
                    }
                    last_sell[stock] = Some(day);
                }
            }
        }
    }

    trader.liquidate(last_day, &mut portfolio)?;
    Ok(())
}

fn cooled(last: Option<usize>, day: usize, cool_down: usize) -> bool {
    match last {
        Some(prev) => day - prev > cool_down,
        None => true,
    }
}
