//! Transaction — one immutable ledger record.

use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(Direction::Buy),
            "sell" => Some(Direction::Sell),
            _ => None,
        }
    }
}

/// One executed trade. Created by the trading operations at execution time,
/// appended to the ledger once, never edited.
///
/// `cash_flow` is the signed net effect on cash including fees:
/// negative for buys, positive for sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub direction: Direction,
    pub day: usize,
    pub stock: usize,
    pub shares: u64,
    pub price: f64,
    pub fees: f64,
    pub cash_flow: f64,
}

impl Transaction {
    /// A purchase: cash flow is -(shares * price + fees).
    pub fn buy(day: usize, stock: usize, shares: u64, price: f64, fees: f64) -> Self {
        Self {
            direction: Direction::Buy,
            day,
            stock,
            shares,
            price,
            fees,
            cash_flow: -(shares as f64 * price + fees),
        }
    }

    /// A full-position sale: cash flow is shares * price - fees.
    pub fn sell(day: usize, stock: usize, shares: u64, price: f64, fees: f64) -> Self {
        Self {
            direction: Direction::Sell,
            day,
            stock,
            shares,
            price,
            fees,
            cash_flow: shares as f64 * price - fees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_cash_flow_includes_fees() {
        let tx = Transaction::buy(5, 2, 10, 100.0, 50.0);
        assert_eq!(tx.direction, Direction::Buy);
        assert_eq!(tx.cash_flow, -1050.0);
    }

    #[test]
    fn sell_cash_flow_subtracts_fees() {
        let tx = Transaction::sell(8, 1, 10, 100.0, 20.0);
        assert_eq!(tx.cash_flow, 980.0);
    }

    #[test]
    fn zero_share_buy_still_costs_fees() {
        let tx = Transaction::buy(0, 0, 0, 100.0, 20.0);
        assert_eq!(tx.cash_flow, -20.0);
    }

    #[test]
    fn direction_round_trip() {
        assert_eq!(Direction::parse("buy"), Some(Direction::Buy));
        assert_eq!(Direction::parse("sell"), Some(Direction::Sell));
        assert_eq!(Direction::parse("hold"), None);
        assert_eq!(Direction::Buy.as_str(), "buy");
    }
}
