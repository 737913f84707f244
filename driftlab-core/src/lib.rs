//! DriftLab Core — synthetic market simulation, indicators, trading, ledger.
//!
//! This crate contains the full pipeline:
//! - Domain types (price matrix, portfolio, transactions)
//! - Random-walk price simulation with news shocks and absorbing failure
//! - Windowed indicators (moving averages, stochastic/RSI oscillators)
//! - Trading operations writing an append-only ledger
//! - Rule-based strategies (random, crossing averages, momentum)
//! - Ledger replay reconstructing portfolio history and profit
//! - Price-table files with trait-based column selection

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod ledger;
pub mod rng;
pub mod sim;
pub mod strategy;
