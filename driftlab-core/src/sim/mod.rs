//! Price simulation — Gaussian random walk with news-driven drift and an
//! absorbing bankruptcy state.
//!
//! Each stock walks independently with its own volatility. On any day a
//! single shared news event may fire, adding drift (magnitude scaled by
//! per-stock volatility) to that day and the following days of its duration.
//! A stock whose price reaches zero or below is failed from that day on:
//! its remaining entries are NaN and it takes no further draws or drift.

pub mod news;

pub use news::NewsEvent;

use crate::domain::PriceMatrix;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default chance of a news event on any given day.
pub const DEFAULT_NEWS_PROBABILITY: f64 = 0.01;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("initial_prices has {prices} entries but volatility has {volatility}")]
    ShapeMismatch { prices: usize, volatility: usize },
    #[error("simulation needs at least one day")]
    NoDays,
    #[error("simulation needs at least one stock")]
    NoStocks,
    #[error("news_probability must be in [0, 1], got {0}")]
    BadProbability(f64),
    #[error("volatility for stock {stock} must be finite and non-negative, got {value}")]
    BadVolatility { stock: usize, value: f64 },
    #[error("initial price for stock {stock} must be finite and non-negative, got {value}")]
    BadInitialPrice { stock: usize, value: f64 },
}

/// Configuration surface for the simulator.
///
/// `initial_prices` and `volatility` must have the same length; an initial
/// price of exactly zero marks that stock failed from day 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub days: usize,
    pub initial_prices: Vec<f64>,
    pub volatility: Vec<f64>,
    pub news_probability: f64,
}

impl SimConfig {
    pub fn new(days: usize, initial_prices: Vec<f64>, volatility: Vec<f64>) -> Self {
        Self {
            days,
            initial_prices,
            volatility,
            news_probability: DEFAULT_NEWS_PROBABILITY,
        }
    }

    pub fn n_stocks(&self) -> usize {
        self.initial_prices.len()
    }

    /// Fail fast on any configuration problem; no partial matrix is ever
    /// produced from an invalid config.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.initial_prices.len() != self.volatility.len() {
            return Err(SimError::ShapeMismatch {
                prices: self.initial_prices.len(),
                volatility: self.volatility.len(),
            });
        }
        if self.days == 0 {
            return Err(SimError::NoDays);
        }
        if self.initial_prices.is_empty() {
            return Err(SimError::NoStocks);
        }
        if !(0.0..=1.0).contains(&self.news_probability) {
            return Err(SimError::BadProbability(self.news_probability));
        }
        for (stock, &v) in self.volatility.iter().enumerate() {
            if !v.is_finite() || v < 0.0 {
                return Err(SimError::BadVolatility { stock, value: v });
            }
        }
        for (stock, &p) in self.initial_prices.iter().enumerate() {
            if !p.is_finite() || p < 0.0 {
                return Err(SimError::BadInitialPrice { stock, value: p });
            }
        }
        Ok(())
    }
}

/// Generate a daily price matrix.
///
/// Day 0 is the initial prices. For day d >= 1 each live stock takes
/// `price[d-1] + N(0, volatility) + drift[d]`, where the drift term
/// accumulates every news event whose duration covers day d. Any price
/// ending a day at or below zero fails the stock from that day onward.
pub fn generate<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<PriceMatrix, SimError> {
    config.validate()?;

    let days = config.days;
    let n = config.n_stocks();
    let mut prices = PriceMatrix::zeros(days, n);

    for stock in 0..n {
        let p0 = config.initial_prices[stock];
        if p0 == 0.0 {
            prices.fail_from(0, stock);
        } else {
            prices.set(0, stock, p0);
        }
    }

    let walk: Vec<Normal<f64>> = config
        .volatility
        .iter()
        .enumerate()
        .map(|(stock, &v)| {
            Normal::new(0.0, v).map_err(|_| SimError::BadVolatility { stock, value: v })
        })
        .collect::<Result<_, _>>()?;

    // Drift from news events, accumulated per (day, stock). An event firing
    // on day d covers days [d, d + duration), clipped at the horizon.
    let mut drift = vec![vec![0.0; n]; days];

    for day in 1..days {
        if rng.gen::<f64>() < config.news_probability {
            let event = NewsEvent::draw(rng);
            let end = (day + event.duration).min(days);
            for affected in drift.iter_mut().take(end).skip(day) {
                for (stock, slot) in affected.iter_mut().enumerate() {
                    *slot += event.drift(config.volatility[stock]);
                }
            }
        }

        for stock in 0..n {
            if prices.is_failed(day - 1, stock) {
                prices.set(day, stock, f64::NAN);
                continue;
            }
            let step = walk[stock].sample(rng);
            let next = prices.get(day - 1, stock) + step + drift[day][stock];
            if next <= 0.0 {
                prices.fail_from(day, stock);
            } else {
                prices.set(day, stock, next);
            }
        }
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    #[test]
    fn rejects_shape_mismatch() {
        let config = SimConfig {
            days: 10,
            initial_prices: vec![100.0, 200.0],
            volatility: vec![1.0],
            news_probability: 0.0,
        };
        assert_eq!(
            generate(&config, &mut rng()).unwrap_err(),
            SimError::ShapeMismatch {
                prices: 2,
                volatility: 1
            }
        );
    }

    #[test]
    fn rejects_bad_probability() {
        let mut config = SimConfig::new(10, vec![100.0], vec![1.0]);
        config.news_probability = 1.5;
        assert!(matches!(
            generate(&config, &mut rng()),
            Err(SimError::BadProbability(_))
        ));
    }

    #[test]
    fn zero_volatility_no_news_is_constant() {
        let mut config = SimConfig::new(10, vec![100.0], vec![0.0]);
        config.news_probability = 0.0;
        let prices = generate(&config, &mut rng()).unwrap();
        for day in 0..10 {
            assert_eq!(prices.get(day, 0), 100.0);
        }
    }

    #[test]
    fn zero_initial_price_fails_whole_column() {
        let mut config = SimConfig::new(5, vec![0.0, 100.0], vec![1.0, 1.0]);
        config.news_probability = 0.0;
        let prices = generate(&config, &mut rng()).unwrap();
        for day in 0..5 {
            assert!(prices.is_failed(day, 0));
            assert!(!prices.is_failed(day, 1));
        }
    }

    #[test]
    fn failure_is_absorbing() {
        // High volatility around a tiny price: most seeds bust quickly.
        let mut config = SimConfig::new(200, vec![1.0], vec![5.0]);
        config.news_probability = 0.0;
        let prices = generate(&config, &mut rng()).unwrap();
        let first_failed = (0..200).find(|&d| prices.is_failed(d, 0));
        let day = first_failed.expect("stock should go bankrupt with this seed");
        for d in day..200 {
            assert!(prices.is_failed(d, 0));
        }
    }

    #[test]
    fn same_seed_same_matrix() {
        let config = SimConfig::new(50, vec![100.0, 50.0], vec![2.0, 1.0]);
        let a = generate(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        for day in 0..50 {
            for stock in 0..2 {
                let (x, y) = (a.get(day, stock), b.get(day, stock));
                assert!(x == y || (x.is_nan() && y.is_nan()));
            }
        }
    }

    #[test]
    fn news_duration_truncates_at_horizon() {
        // Probability 1: an event fires every day; events near the end must
        // clip instead of panicking.
        let mut config = SimConfig::new(8, vec![1000.0], vec![0.5]);
        config.news_probability = 1.0;
        let prices = generate(&config, &mut rng()).unwrap();
        assert_eq!(prices.n_days(), 8);
    }
}
