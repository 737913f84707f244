//! News shock events.
//!
//! At most one event fires per day, shared by every live stock: a magnitude
//! drawn from N(0, 2) and a duration drawn uniformly from [3, 14] days. The
//! per-stock drift is the magnitude scaled by that stock's own volatility,
//! added once per day for the duration (truncated at the horizon). Events
//! are consumed immediately into the price matrix and never persisted.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Shortest news effect, in days.
pub const MIN_DURATION: usize = 3;
/// Longest news effect, in days (inclusive).
pub const MAX_DURATION: usize = 14;

/// Standard deviation of the magnitude draw.
const MAGNITUDE_STD_DEV: f64 = 2.0;

/// One news event: a shared magnitude and how many days it lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewsEvent {
    pub magnitude: f64,
    pub duration: usize,
}

impl NewsEvent {
    /// Draw a fresh event. The magnitude distribution has constant
    /// parameters, so construction cannot fail.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        let magnitude = Normal::new(0.0, MAGNITUDE_STD_DEV)
            .expect("constant std dev is valid")
            .sample(rng);
        let duration = rng.gen_range(MIN_DURATION..=MAX_DURATION);
        Self {
            magnitude,
            duration,
        }
    }

    /// Daily drift this event adds to a stock with the given volatility.
    pub fn drift(&self, volatility: f64) -> f64 {
        self.magnitude * volatility
    }
}
