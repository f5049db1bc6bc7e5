//! Core identifier types for the trader network.
//!
//! Traders are identified by the index of the graph node they were created
//! from, so ids stay stable across adaptation and simulation.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Core ID Types
// =============================================================================

/// Unique identifier for a trader.
///
/// Equal to the index of the originating graph node.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct TraderId(pub usize);

impl TraderId {
    /// Position of the trader in node-index order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trader#{}", self.0)
    }
}

// =============================================================================
// Time Types
// =============================================================================

/// Simulation step label (discrete time value).
pub type Step = u64;
