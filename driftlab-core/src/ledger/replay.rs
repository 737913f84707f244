//! Ledger replay — reconstructs portfolio history and profit from the
//! transaction log alone, independent of the engines that produced it.
//!
//! The whole replay aborts on the first malformed line: portfolio
//! reconstruction needs the complete, ordered transaction sequence, so
//! skipping bad records would silently corrupt every later snapshot.

use crate::domain::{Direction, Transaction};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

const FIELDS_PER_RECORD: usize = 7;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read ledger: {0}")]
    Csv(#[from] csv::Error),
    #[error("ledger line {line}: expected {FIELDS_PER_RECORD} fields, got {got}")]
    FieldCount { line: usize, got: usize },
    #[error("ledger line {line}: unknown direction {value:?}")]
    BadDirection { line: usize, value: String },
    #[error("ledger line {line}: bad {field} value {value:?}")]
    BadNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("ledger is empty")]
    Empty,
    #[error("day {day}: ledger sells {sold} shares of stock {stock} with only {held} held")]
    NegativeHoldings {
        day: usize,
        stock: usize,
        sold: u64,
        held: u64,
    },
}

/// Aggregate cash totals for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    /// Distinct trading days after the day-0 portfolio creation.
    pub trading_days_after_creation: usize,
    /// Sum of all negative cash flows, sign-flipped.
    pub total_spent: f64,
    /// Sum of all positive cash flows.
    pub total_earned: f64,
    /// `total_earned - total_spent`.
    pub net_profit: f64,
}

/// Buy/sell days and net cash contribution of one requested stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDetail {
    pub stock: usize,
    pub bought_days: Vec<usize>,
    pub sold_days: Vec<usize>,
    pub net_cash: f64,
}

/// Everything `read_ledger` reconstructs.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
    /// Holdings after the day-0 transactions.
    pub initial_portfolio: Vec<u64>,
    /// Holdings immediately before the last trading day (the forced
    /// liquidation) — what an investor held before the close-out.
    pub final_portfolio: Vec<u64>,
    /// One `(day, holdings)` snapshot per distinct trading day, in order.
    pub history: Vec<(usize, Vec<u64>)>,
    pub summary: LedgerSummary,
    pub stock_detail: Option<StockDetail>,
}

/// Parse the full transaction sequence out of a ledger file.
pub fn parse_ledger(path: &Path) -> Result<Vec<Transaction>, ReplayError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut transactions = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = idx + 1;
        if record.len() != FIELDS_PER_RECORD {
            return Err(ReplayError::FieldCount {
                line,
                got: record.len(),
            });
        }
        let direction = Direction::parse(&record[0]).ok_or_else(|| ReplayError::BadDirection {
            line,
            value: record[0].to_string(),
        })?;
        let tx = Transaction {
            direction,
            day: parse_field(&record[1], line, "day")?,
            stock: parse_field(&record[2], line, "stock")?,
            shares: parse_field(&record[3], line, "shares")?,
            price: parse_field(&record[4], line, "price")?,
            fees: parse_field(&record[5], line, "fees")?,
            cash_flow: parse_field(&record[6], line, "cash_flow")?,
        };
        transactions.push(tx);
    }
    Ok(transactions)
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    line: usize,
    field: &'static str,
) -> Result<T, ReplayError> {
    raw.parse().map_err(|_| ReplayError::BadNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

/// Replay a ledger into portfolio history and profit totals.
///
/// Pass a stock id to additionally collect that stock's buy/sell days and
/// net cash contribution.
pub fn read_ledger(path: &Path, stock: Option<usize>) -> Result<LedgerReport, ReplayError> {
    let transactions = parse_ledger(path)?;
    replay(&transactions, stock)
}

/// Replay an already-parsed transaction sequence.
pub fn replay(
    transactions: &[Transaction],
    stock: Option<usize>,
) -> Result<LedgerReport, ReplayError> {
    if transactions.is_empty() {
        return Err(ReplayError::Empty);
    }

    let n_stocks = transactions.iter().map(|t| t.stock).max().unwrap_or(0) + 1;
    let mut holdings = vec![0u64; n_stocks];
    let mut history: Vec<(usize, Vec<u64>)> = Vec::new();

    for tx in transactions {
        match tx.direction {
            Direction::Buy => holdings[tx.stock] += tx.shares,
            Direction::Sell => {
                let held = holdings[tx.stock];
                holdings[tx.stock] =
                    held.checked_sub(tx.shares)
                        .ok_or(ReplayError::NegativeHoldings {
                            day: tx.day,
                            stock: tx.stock,
                            sold: tx.shares,
                            held,
                        })?;
            }
        }
        match history.last_mut() {
            Some((day, snapshot)) if *day == tx.day => *snapshot = holdings.clone(),
            _ => history.push((tx.day, holdings.clone())),
        }
    }

    let total_spent: f64 = transactions
        .iter()
        .map(|t| t.cash_flow)
        .filter(|&c| c < 0.0)
        .map(|c| -c)
        .sum();
    let total_earned: f64 = transactions
        .iter()
        .map(|t| t.cash_flow)
        .filter(|&c| c > 0.0)
        .sum();

    let initial_portfolio = history[0].1.clone();
    let final_portfolio = if history.len() > 1 {
        history[history.len() - 2].1.clone()
    } else {
        initial_portfolio.clone()
    };

    let stock_detail = stock.map(|id| {
        let mut bought_days = Vec::new();
        let mut sold_days = Vec::new();
        let mut net_cash = 0.0;
        for tx in transactions.iter().filter(|t| t.stock == id) {
            net_cash += tx.cash_flow;
            let days = match tx.direction {
                Direction::Buy => &mut bought_days,
                Direction::Sell => &mut sold_days,
            };
            if days.last() != Some(&tx.day) {
                days.push(tx.day);
            }
        }
        StockDetail {
            stock: id,
            bought_days,
            sold_days,
            net_cash,
        }
    });

    Ok(LedgerReport {
        initial_portfolio,
        final_portfolio,
        summary: LedgerSummary {
            trading_days_after_creation: history.len().saturating_sub(1),
            total_spent,
            total_earned,
            net_profit: total_earned - total_spent,
        },
        history,
        stock_detail,
    })
}

/// Cumulative cash flow by trading day — the profit/loss series over time.
pub fn profit_curve(transactions: &[Transaction]) -> Vec<(usize, f64)> {
    let mut curve: Vec<(usize, f64)> = Vec::new();
    let mut running = 0.0;
    for tx in transactions {
        running += tx.cash_flow;
        match curve.last_mut() {
            Some((day, total)) if *day == tx.day => *total = running,
            _ => curve.push((tx.day, running)),
        }
    }
    curve
}
