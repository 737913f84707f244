//! Portfolio engine — the trading operations shared by every strategy.

pub mod trading;

pub use trading::{TradeError, Trader};
