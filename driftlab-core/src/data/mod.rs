//! Price-table files and column selection.
//!
//! A table file is whitespace-separated: one row per day, one column per
//! stock. An optional first row carries per-stock volatilities instead of
//! prices. Selection picks, for each requested value, the still-unused
//! column whose initial price (or realized volatility) is closest.

use crate::domain::PriceMatrix;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("table is empty")]
    Empty,
    #[error("row {row}: expected {expected} columns, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("row {row}, column {column}: bad number {value:?}")]
    BadNumber {
        row: usize,
        column: usize,
        value: String,
    },
    #[error("requested {requested} stocks but the table only has {available}")]
    NotEnoughColumns { requested: usize, available: usize },
}

/// A loaded table: prices plus the optional volatility header row.
#[derive(Debug, Clone)]
pub struct PriceTable {
    pub prices: PriceMatrix,
    pub volatility: Option<Vec<f64>>,
}

/// Columns picked out of a table, with the traits they were picked by.
#[derive(Debug, Clone)]
pub struct Selection {
    pub prices: PriceMatrix,
    pub initial_prices: Vec<f64>,
    pub volatilities: Vec<f64>,
}

/// Load a whitespace-separated table. With `volatility_header` the first
/// row is read as per-stock volatilities rather than day-0 prices.
///
/// Non-positive or missing day-0 prices mark the whole column failed.
pub fn load_table(path: &Path, volatility_header: bool) -> Result<PriceTable, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut n_columns = 0;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = idx + 1;
        let mut values = Vec::new();
        for (col, token) in line.split_whitespace().enumerate() {
            let value = token.parse::<f64>().map_err(|_| DataError::BadNumber {
                row,
                column: col + 1,
                value: token.to_string(),
            })?;
            values.push(value);
        }
        if rows.is_empty() {
            n_columns = values.len();
        } else if values.len() != n_columns {
            return Err(DataError::RaggedRow {
                row,
                expected: n_columns,
                got: values.len(),
            });
        }
        rows.push(values);
    }

    let volatility = if volatility_header && !rows.is_empty() {
        Some(rows.remove(0))
    } else {
        None
    };
    if rows.is_empty() || n_columns == 0 {
        return Err(DataError::Empty);
    }

    let mut prices = PriceMatrix::from_rows(&rows);
    prices.normalize_failures();
    Ok(PriceTable { prices, volatility })
}

impl PriceTable {
    /// Per-column volatility: the header row when present, otherwise the
    /// realized day-to-day standard deviation.
    pub fn volatilities(&self) -> Vec<f64> {
        match &self.volatility {
            Some(header) => header.clone(),
            None => (0..self.prices.n_stocks())
                .map(|stock| realized_volatility(&self.prices.column(stock)))
                .collect(),
        }
    }

    /// For each target, pick the unused column whose day-0 price is
    /// closest.
    pub fn select_by_initial_price(&self, targets: &[f64]) -> Result<Selection, DataError> {
        let traits: Vec<f64> = (0..self.prices.n_stocks())
            .map(|stock| self.prices.get(0, stock))
            .collect();
        self.select(targets, &traits)
    }

    /// For each target, pick the unused column whose volatility is
    /// closest.
    pub fn select_by_volatility(&self, targets: &[f64]) -> Result<Selection, DataError> {
        let traits = self.volatilities();
        self.select(targets, &traits)
    }

    fn select(&self, targets: &[f64], traits: &[f64]) -> Result<Selection, DataError> {
        if targets.len() > self.prices.n_stocks() {
            return Err(DataError::NotEnoughColumns {
                requested: targets.len(),
                available: self.prices.n_stocks(),
            });
        }

        let volatilities = self.volatilities();
        let mut pool: Vec<usize> = (0..self.prices.n_stocks()).collect();
        let mut picked = Vec::with_capacity(targets.len());
        for &target in targets {
            let (pos, _) = pool
                .iter()
                .enumerate()
                .min_by(|(_, &a), (_, &b)| {
                    distance(traits[a], target)
                        .partial_cmp(&distance(traits[b], target))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap();
            picked.push(pool.swap_remove(pos));
        }

        let columns: Vec<Vec<f64>> = picked.iter().map(|&c| self.prices.column(c)).collect();
        Ok(Selection {
            prices: PriceMatrix::from_columns(&columns),
            initial_prices: picked.iter().map(|&c| self.prices.get(0, c)).collect(),
            volatilities: picked.iter().map(|&c| volatilities[c]).collect(),
        })
    }
}

fn distance(value: f64, target: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        (value - target).abs()
    }
}

/// Population standard deviation of day-to-day changes, ignoring days
/// after a failure.
fn realized_volatility(column: &[f64]) -> f64 {
    let deltas: Vec<f64> = column
        .windows(2)
        .filter(|w| !w[0].is_nan() && !w[1].is_nan())
        .map(|w| w[1] - w[0])
        .collect();
    if deltas.is_empty() {
        return f64::NAN;
    }
    let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
    let variance = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / deltas.len() as f64;
    variance.sqrt()
}
