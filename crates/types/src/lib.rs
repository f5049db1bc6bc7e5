//! Core types for the trader network simulation.
//!
//! This crate provides the data types shared across the workspace:
//! trader identifiers, step labels, and the discrete market position
//! used by threshold-based update rules.

mod ids;

pub use ids::{Step, TraderId};

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Position
// =============================================================================

/// Discrete buy/hold/sell position of a trader.
///
/// The numeric signal follows the convention of the social-network
/// investment model: buy = -1, hold = 0, sell = +1. Summing the signals of
/// all traders gives the net selling pressure of the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Position {
    Buy,
    #[default]
    Hold,
    Sell,
}

impl Position {
    /// Numeric signal of this position.
    #[inline]
    pub fn signal(self) -> f64 {
        match self {
            Position::Buy => -1.0,
            Position::Hold => 0.0,
            Position::Sell => 1.0,
        }
    }

    /// Classify a continuous signal by its sign.
    ///
    /// Exact zero (and NaN) map to `Hold`.
    pub fn from_signal(signal: f64) -> Self {
        if signal < 0.0 {
            Position::Buy
        } else if signal > 0.0 {
            Position::Sell
        } else {
            Position::Hold
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Buy => write!(f, "BUY"),
            Position::Hold => write!(f, "HOLD"),
            Position::Sell => write!(f, "SELL"),
        }
    }
}
