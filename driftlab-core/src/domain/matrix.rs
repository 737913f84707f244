//! PriceMatrix — the days × stocks price grid.
//!
//! Entries are daily closing prices; NaN is the failure sentinel. Once a
//! stock fails on day d, every entry for that stock on days >= d is NaN
//! (absorbing state — `fail_from` is the only way to introduce NaN).
//! Indicator outputs reuse the same type and sentinel: NaN there means
//! "undefined" (warm-up prefix or propagated failure).

use serde::{Deserialize, Serialize};

/// Dense row-major matrix of daily prices (or indicator values) per stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceMatrix {
    days: usize,
    stocks: usize,
    values: Vec<f64>,
}

impl PriceMatrix {
    /// All-zero matrix. Panics if either dimension is zero.
    pub fn zeros(days: usize, stocks: usize) -> Self {
        assert!(days >= 1, "matrix needs at least one day");
        assert!(stocks >= 1, "matrix needs at least one stock");
        Self {
            days,
            stocks,
            values: vec![0.0; days * stocks],
        }
    }

    /// All-NaN matrix (everything undefined).
    pub fn undefined(days: usize, stocks: usize) -> Self {
        let mut m = Self::zeros(days, stocks);
        m.values.fill(f64::NAN);
        m
    }

    /// Build from per-stock columns. All columns must have the same length.
    pub fn from_columns(columns: &[Vec<f64>]) -> Self {
        assert!(!columns.is_empty(), "matrix needs at least one stock");
        let days = columns[0].len();
        assert!(
            columns.iter().all(|c| c.len() == days),
            "all columns must have the same number of days"
        );
        let mut m = Self::zeros(days, columns.len());
        for (stock, column) in columns.iter().enumerate() {
            for (day, &value) in column.iter().enumerate() {
                m.set(day, stock, value);
            }
        }
        m
    }

    /// Build from per-day rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        assert!(!rows.is_empty(), "matrix needs at least one day");
        let stocks = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == stocks),
            "all rows must have the same number of stocks"
        );
        let mut m = Self::zeros(rows.len(), stocks);
        for (day, row) in rows.iter().enumerate() {
            for (stock, &value) in row.iter().enumerate() {
                m.set(day, stock, value);
            }
        }
        m
    }

    pub fn n_days(&self) -> usize {
        self.days
    }

    pub fn n_stocks(&self) -> usize {
        self.stocks
    }

    pub fn get(&self, day: usize, stock: usize) -> f64 {
        self.values[day * self.stocks + stock]
    }

    pub fn set(&mut self, day: usize, stock: usize, value: f64) {
        self.values[day * self.stocks + stock] = value;
    }

    /// True when the entry is the NaN sentinel (failed or undefined).
    pub fn is_failed(&self, day: usize, stock: usize) -> bool {
        self.get(day, stock).is_nan()
    }

    /// Mark a stock failed from `day` to the end of the matrix (absorbing).
    pub fn fail_from(&mut self, day: usize, stock: usize) {
        for d in day..self.days {
            self.set(d, stock, f64::NAN);
        }
    }

    /// Copy of one stock's full price series.
    pub fn column(&self, stock: usize) -> Vec<f64> {
        (0..self.days).map(|d| self.get(d, stock)).collect()
    }

    /// One day's prices across all stocks.
    pub fn row(&self, day: usize) -> Vec<f64> {
        (0..self.stocks).map(|s| self.get(day, s)).collect()
    }

    /// Enforce the absorbing invariant on externally loaded data: for each
    /// stock, NaN-out everything from the first day its price is <= 0 or NaN.
    pub fn normalize_failures(&mut self) {
        for stock in 0..self.stocks {
            let first_bust = (0..self.days)
                .find(|&d| !(self.get(d, stock) > 0.0));
            if let Some(day) = first_bust {
                self.fail_from(day, stock);
            }
        }
    }
}
