//! Append-only ledger persistence and offline replay.

pub mod replay;
pub mod store;

pub use replay::{
    parse_ledger, profit_curve, read_ledger, replay, LedgerReport, LedgerSummary, ReplayError,
    StockDetail,
};
pub use store::{LedgerError, LedgerStore};
