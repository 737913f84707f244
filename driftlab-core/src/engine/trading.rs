//! Trading operations — buy, sell, portfolio creation, liquidation.
//!
//! A `Trader` binds a price matrix, a fixed per-transaction fee, and the
//! ledger it appends to. It mutates the caller's `Portfolio` through the
//! documented operations only; the portfolio is never shared between runs.
//!
//! Zero-share policy: zero-share buys ARE logged (a day-0 ledger then
//! carries one record per stock, which keeps the ledger self-describing
//! for replay); zero-share sells are NOT logged.

use crate::domain::{Portfolio, PriceMatrix, Transaction};
use crate::ledger::{LedgerError, LedgerStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradeError {
    #[error("allocated {amounts} purchase amounts for {stocks} stocks")]
    AllocationMismatch { amounts: usize, stocks: usize },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Executes trades against a price matrix, logging each one to a ledger.
#[derive(Debug)]
pub struct Trader<'a> {
    prices: &'a PriceMatrix,
    fees: f64,
    ledger: LedgerStore,
}

impl<'a> Trader<'a> {
    pub fn new(prices: &'a PriceMatrix, fees: f64, ledger: LedgerStore) -> Self {
        Self {
            prices,
            fees,
            ledger,
        }
    }

    pub fn prices(&self) -> &PriceMatrix {
        self.prices
    }

    pub fn fees(&self) -> f64 {
        self.fees
    }

    /// Buy as many whole shares as `available_capital` covers after fees.
    ///
    /// A failed price is a no-op except that the holding is forced to zero
    /// and nothing is logged.
    pub fn buy(
        &self,
        day: usize,
        stock: usize,
        available_capital: f64,
        portfolio: &mut Portfolio,
    ) -> Result<(), LedgerError> {
        if self.prices.is_failed(day, stock) {
            portfolio.set(stock, 0);
            return Ok(());
        }
        let price = self.prices.get(day, stock);
        let affordable = ((available_capital - self.fees) / price).floor();
        let shares = if affordable > 0.0 { affordable as u64 } else { 0 };
        portfolio.add(stock, shares);
        self.ledger
            .append(&Transaction::buy(day, stock, shares, price, self.fees))
    }

    /// Sell the entire current holding of a stock.
    ///
    /// A failed price forces the holding to zero without logging; a
    /// zero-share holding is cleared but not logged either.
    pub fn sell(
        &self,
        day: usize,
        stock: usize,
        portfolio: &mut Portfolio,
    ) -> Result<(), LedgerError> {
        if self.prices.is_failed(day, stock) {
            portfolio.set(stock, 0);
            return Ok(());
        }
        let held = portfolio.clear(stock);
        if held == 0 {
            return Ok(());
        }
        let price = self.prices.get(day, stock);
        self.ledger
            .append(&Transaction::sell(day, stock, held, price, self.fees))
    }

    /// Buy every stock at day 0 with its allotted capital.
    pub fn create_portfolio(&self, available_amounts: &[f64]) -> Result<Portfolio, TradeError> {
        let stocks = self.prices.n_stocks();
        if available_amounts.len() != stocks {
            return Err(TradeError::AllocationMismatch {
                amounts: available_amounts.len(),
                stocks,
            });
        }
        let mut portfolio = Portfolio::new(stocks);
        for (stock, &amount) in available_amounts.iter().enumerate() {
            self.buy(0, stock, amount, &mut portfolio)?;
        }
        Ok(portfolio)
    }

    /// Forced full liquidation: sell every stock on the given day.
    pub fn liquidate(&self, day: usize, portfolio: &mut Portfolio) -> Result<(), LedgerError> {
        for stock in 0..self.prices.n_stocks() {
            self.sell(day, stock, portfolio)?;
        }
        Ok(())
    }
}
