//! Domain types for DriftLab.

pub mod matrix;
pub mod portfolio;
pub mod transaction;

pub use matrix::PriceMatrix;
pub use portfolio::Portfolio;
pub use transaction::{Direction, Transaction};
