//! Error types for running a simulation.

use agents::AgentError;
use sim_core::SimCoreError;
use types::TraderId;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// The network has no traders.
    #[error("network has no traders")]
    EmptyNetwork,

    /// The step sequence is empty.
    #[error("step sequence is empty")]
    InvalidStepCount,

    /// The update rule cannot drive a trader.
    #[error("rule rejected {trader}: {reason}")]
    InvalidRule { trader: TraderId, reason: String },

    /// The aggregator needs a clearing price the rule does not produce.
    #[error("aggregator needs a clearing price but the rule produces none")]
    MissingQuote,

    /// Market clearing failed.
    #[error("clearing failed: {0}")]
    Clearing(#[from] SimCoreError),

    /// Trader state could not be updated.
    #[error("trader update failed: {0}")]
    Agent(AgentError),
}

impl From<AgentError> for SimulationError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidRule { trader, reason } => {
                SimulationError::InvalidRule { trader, reason }
            }
            AgentError::Clearing(err) => SimulationError::Clearing(err),
            other => SimulationError::Agent(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_errors_flatten() {
        let err: SimulationError = AgentError::Clearing(SimCoreError::EmptyBook).into();
        assert_eq!(err, SimulationError::Clearing(SimCoreError::EmptyBook));

        let err: SimulationError = AgentError::InvalidRule {
            trader: TraderId(2),
            reason: "bad".into(),
        }
        .into();
        assert!(matches!(err, SimulationError::InvalidRule { trader: TraderId(2), .. }));

        let err: SimulationError = AgentError::ZeroMemory.into();
        assert_eq!(err, SimulationError::Agent(AgentError::ZeroMemory));
    }
}
