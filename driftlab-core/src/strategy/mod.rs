//! Trading strategies — per-day decision loops over a price matrix.
//!
//! Every strategy starts by creating a portfolio at day 0 (spending
//! `amount` per stock) and ends with a forced full liquidation on the
//! final day. Decisions in between are strategy-specific; all trades go
//! through the same `Trader` operations and land in one ledger per run.

pub mod crossing_averages;
pub mod momentum;
pub mod random;

use crate::domain::PriceMatrix;
use crate::engine::TradeError;
use crate::indicators::{IndicatorError, OscillatorKind};
use crate::ledger::{LedgerError, LedgerStore};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default fixed fee per transaction.
pub const DEFAULT_FEES: f64 = 20.0;
/// Default capital per purchase (must also cover fees).
pub const DEFAULT_AMOUNT: f64 = 5_000.0;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("period and window lengths must be >= 1")]
    ZeroPeriod,
    #[error("purchase amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("slow period ({slow}) must exceed fast period ({fast})")]
    SlowNotAboveFast { slow: usize, fast: usize },
    #[error("lower threshold ({lower}) must be below upper threshold ({upper})")]
    ThresholdOrder { lower: f64, upper: f64 },
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error(transparent)]
    Trade(#[from] TradeError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Serializable strategy configuration (TOML/JSON), with defaults for
/// every parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Every `period` days, draw buy/sell/hold per stock with equal
    /// probability.
    Random {
        #[serde(default = "defaults::period")]
        period: usize,
        #[serde(default = "defaults::amount")]
        amount: f64,
    },
    /// Trade on fast/slow moving-average crossings.
    CrossingAverages {
        #[serde(default = "defaults::amount")]
        amount: f64,
        #[serde(default = "defaults::slow")]
        slow: usize,
        #[serde(default = "defaults::fast")]
        fast: usize,
        #[serde(default)]
        slow_weights: Option<Vec<f64>>,
        #[serde(default)]
        fast_weights: Option<Vec<f64>>,
        /// Days after a trade during which repeated signals of the same
        /// kind are suppressed (0 = disabled).
        #[serde(default)]
        cool_down: usize,
    },
    /// Trade on oscillator threshold breaches sustained for `wait_time`
    /// days.
    Momentum {
        #[serde(default = "defaults::oscillator")]
        kind: OscillatorKind,
        #[serde(default = "defaults::lower")]
        lower: f64,
        #[serde(default = "defaults::upper")]
        upper: f64,
        #[serde(default = "defaults::window")]
        window: usize,
        #[serde(default = "defaults::wait_time")]
        wait_time: usize,
        #[serde(default)]
        smoothing: Option<usize>,
        #[serde(default = "defaults::amount")]
        amount: f64,
    },
}

mod defaults {
    use crate::indicators::OscillatorKind;

    pub fn period() -> usize {
        7
    }
    pub fn amount() -> f64 {
        super::DEFAULT_AMOUNT
    }
    pub fn slow() -> usize {
        200
    }
    pub fn fast() -> usize {
        50
    }
    pub fn oscillator() -> OscillatorKind {
        OscillatorKind::Stochastic
    }
    pub fn lower() -> f64 {
        0.25
    }
    pub fn upper() -> f64 {
        0.75
    }
    pub fn window() -> usize {
        7
    }
    pub fn wait_time() -> usize {
        3
    }
}

impl StrategySpec {
    /// The random strategy with all defaults.
    pub fn random() -> Self {
        StrategySpec::Random {
            period: defaults::period(),
            amount: defaults::amount(),
        }
    }

    /// The crossing-averages strategy with all defaults.
    pub fn crossing_averages() -> Self {
        StrategySpec::CrossingAverages {
            amount: defaults::amount(),
            slow: defaults::slow(),
            fast: defaults::fast(),
            slow_weights: None,
            fast_weights: None,
            cool_down: 0,
        }
    }

    /// The momentum strategy with all defaults.
    pub fn momentum() -> Self {
        StrategySpec::Momentum {
            kind: defaults::oscillator(),
            lower: defaults::lower(),
            upper: defaults::upper(),
            window: defaults::window(),
            wait_time: defaults::wait_time(),
            smoothing: None,
            amount: defaults::amount(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategySpec::Random { .. } => "random",
            StrategySpec::CrossingAverages { .. } => "crossing_averages",
            StrategySpec::Momentum { .. } => "momentum",
        }
    }

    /// Fail fast on configuration problems before any ledger is touched.
    pub fn validate(&self) -> Result<(), StrategyError> {
        match self {
            StrategySpec::Random { period, amount } => {
                if *period == 0 {
                    return Err(StrategyError::ZeroPeriod);
                }
                check_amount(*amount)
            }
            StrategySpec::CrossingAverages {
                amount, slow, fast, ..
            } => {
                if *fast == 0 {
                    return Err(StrategyError::ZeroPeriod);
                }
                if slow <= fast {
                    return Err(StrategyError::SlowNotAboveFast {
                        slow: *slow,
                        fast: *fast,
                    });
                }
                check_amount(*amount)
            }
            StrategySpec::Momentum {
                lower,
                upper,
                window,
                amount,
                smoothing,
                ..
            } => {
                if *window == 0 || *smoothing == Some(0) {
                    return Err(StrategyError::ZeroPeriod);
                }
                if lower >= upper {
                    return Err(StrategyError::ThresholdOrder {
                        lower: *lower,
                        upper: *upper,
                    });
                }
                check_amount(*amount)
            }
        }
    }
}

fn check_amount(amount: f64) -> Result<(), StrategyError> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(StrategyError::NonPositiveAmount(amount))
    }
}

/// Run a strategy over the full price matrix, appending every trade to a
/// fresh ledger at `ledger_path`.
pub fn run<R: Rng>(
    spec: &StrategySpec,
    prices: &PriceMatrix,
    fees: f64,
    ledger_path: &Path,
    rng: &mut R,
) -> Result<(), StrategyError> {
    spec.validate()?;
    let ledger = LedgerStore::new(ledger_path);
    match spec {
        StrategySpec::Random { period, amount } => {
            random::run(prices, *period, *amount, fees, ledger, rng)
        }
        StrategySpec::CrossingAverages {
            amount,
            slow,
            fast,
            slow_weights,
            fast_weights,
            cool_down,
        } => crossing_averages::run(
            prices,
            *amount,
            *slow,
            *fast,
            slow_weights.as_deref(),
            fast_weights.as_deref(),
            *cool_down,
            fees,
            ledger,
        ),
        StrategySpec::Momentum {
            kind,
            lower,
            upper,
            window,
            wait_time,
            smoothing,
            amount,
        } => momentum::run(
            prices,
            *kind,
            *lower,
            *upper,
            *window,
            *wait_time,
            *smoothing,
            *amount,
            fees,
            ledger,
        ),
    }
}
