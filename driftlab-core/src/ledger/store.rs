//! Append-only transaction ledger.
//!
//! One textual record per transaction:
//! `direction,day,stock,shares,price,fees,cash_flow`
//! with monetary fields at 2 decimal digits and no header line. Every
//! append opens the file, writes one record, flushes, and closes — there
//! is no batching, so file order is execution order. Serializing
//! concurrent writers to the same path is the caller's responsibility;
//! the engines use one ledger per run.

use crate::domain::Transaction;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Handle to a ledger file. Owns no state beyond the path it appends to.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one transaction, creating the file if needed.
    pub fn append(&self, tx: &Transaction) -> Result<(), LedgerError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&[
            tx.direction.as_str().to_string(),
            tx.day.to_string(),
            tx.stock.to_string(),
            tx.shares.to_string(),
            format!("{:.2}", tx.price),
            format!("{:.2}", tx.fees),
            format!("{:.2}", tx.cash_flow),
        ])?;
        writer.flush()?;
        Ok(())
    }
}
