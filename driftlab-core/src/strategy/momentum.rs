//! Oscillator threshold trading with a confirmation delay.
//!
//! Per stock, a breach below `lower` arms a buy and a breach above
//! `upper` arms a sell. The trade fires once the breach has persisted
//! for `wait_time` days (with `wait_time` 0 it fires on the breach day)
//! and re-arms only after the oscillator returns inside the band.

use crate::domain::PriceMatrix;
use crate::engine::Trader;
use crate::indicators::{oscillator, OscillatorKind};
use crate::ledger::LedgerStore;

use super::StrategyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArmState {
    /// Oscillator inside the band (or undefined).
    Neutral,
    /// Below `lower` since `since`, buy pending.
    ArmedLow { since: usize },
    /// Above `upper` since `since`, sell pending.
    ArmedHigh { since: usize },
    /// Buy fired, waiting to re-enter the band.
    FiredLow,
    /// Sell fired, waiting to re-enter the band.
    FiredHigh,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    prices: &PriceMatrix,
    kind: OscillatorKind,
    lower: f64,
    upper: f64,
    window: usize,
    wait_time: usize,
    smoothing: Option<usize>,
    amount: f64,
    fees: f64,
    ledger: LedgerStore,
) -> Result<(), StrategyError> {
    let signal = oscillator(prices, window, kind, smoothing)?;

    let trader = Trader::new(prices, fees, ledger);
    let allocations = vec![amount; prices.n_stocks()];
    let mut portfolio = trader.create_portfolio(&allocations)?;

    let mut states = vec![ArmState::Neutral; prices.n_stocks()];
    let start = window - 1 + smoothing.map(|p| p - 1).unwrap_or(0);
    let last_day = prices.n_days() - 1;

    for day in start..last_day {
        for stock in 0..prices.n_stocks() {
            let v = signal.get(day, stock);
            if v.is_nan() {
                states[stock] = ArmState::Neutral;
                continue;
            }

            states[stock] = match states[stock] {
                ArmState::Neutral => {
                    if v < lower {
                        if wait_time == 0 {
                            trader.buy(day, stock, amount, &mut portfolio)?;
                            ArmState::FiredLow
                        } else {
                            ArmState::ArmedLow { since: day }
                        }
                    } else if v > upper {
                        if wait_time == 0 {
                            trader.sell(day, stock, &mut portfolio)?;
                            ArmState::FiredHigh
                        } else {
                            ArmState::ArmedHigh { since: day }
                        }
                    } else {
                        ArmState::Neutral
                    }
                }
                ArmState::ArmedLow { since } => {
                    if v >= lower {
                        ArmState::Neutral
                    } else if day - since >= wait_time {
                        trader.buy(day, stock, amount, &mut portfolio)?;
                        ArmState::FiredLow
                    } else {
                        ArmState::ArmedLow { since }
                    }
                }
                ArmState::ArmedHigh { since } => {
                    if v <= upper {
                        ArmState::Neutral
                    } else if day - since >= wait_time {
                        trader.sell(day, stock, &mut portfolio)?;
                        ArmState::FiredHigh
                    } else {
                        ArmState::ArmedHigh { since }
                    }
                }
                ArmState::FiredLow => {
                    if v >= lower {
                        ArmState::Neutral
                    } else {
                        ArmState::FiredLow
                    }
                }
                ArmState::FiredHigh => {
                    if v <= upper {
                        ArmState::Neutral
                    } else {
                        ArmState::FiredHigh
                    }
                }
            };
        }
    }

    trader.liquidate(last_day, &mut portfolio)?;
    Ok(())
}
