//! Portfolio — per-stock integer share counts for one strategy run.
//!
//! Owned by the run that created it and mutated only through the trading
//! operations; nothing else holds a reference to it.

use serde::{Deserialize, Serialize};

/// Current holdings: one non-negative share count per stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<u64>,
}

impl Portfolio {
    /// Empty portfolio over `n_stocks` stocks.
    pub fn new(n_stocks: usize) -> Self {
        Self {
            holdings: vec![0; n_stocks],
        }
    }

    pub fn n_stocks(&self) -> usize {
        self.holdings.len()
    }

    pub fn shares(&self, stock: usize) -> u64 {
        self.holdings[stock]
    }

    pub fn set(&mut self, stock: usize, shares: u64) {
        self.holdings[stock] = shares;
    }

    pub fn add(&mut self, stock: usize, shares: u64) {
        self.holdings[stock] += shares;
    }

    /// Zero out a holding and return what was held.
    pub fn clear(&mut self, stock: usize) -> u64 {
        std::mem::take(&mut self.holdings[stock])
    }

    pub fn holdings(&self) -> &[u64] {
        &self.holdings
    }

    pub fn total_shares(&self) -> u64 {
        self.holdings.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.iter().all(|&h| h == 0)
    }
}
