//! Error types for trader construction and update rules.

use sim_core::SimCoreError;
use types::TraderId;

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors raised while building traders or running an update rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    /// A parameter source cannot produce values.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A per-trader list is shorter than the number of traders.
    #[error("parameter `{name}` has {len} per-trader values, no value for trader {index}")]
    MissingPerTraderValue {
        name: &'static str,
        index: usize,
        len: usize,
    },

    /// Trader memory must hold at least one past step.
    #[error("memory length must be at least 1")]
    ZeroMemory,

    /// The update rule cannot drive this trader.
    #[error("rule rejected {trader}: {reason}")]
    InvalidRule { trader: TraderId, reason: String },

    /// Market clearing failed.
    #[error("clearing failed: {0}")]
    Clearing(#[from] SimCoreError),
}
