//! Error types for graph adaptation.

use agents::AgentError;

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// Influence is directional; undirected graphs are rejected.
    #[error("graph must be directed")]
    InvalidGraphKind,

    /// Trader parameters could not be drawn.
    #[error("invalid trader config: {0}")]
    InvalidTraderConfig(#[from] AgentError),
}
