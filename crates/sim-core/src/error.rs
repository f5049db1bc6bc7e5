//! Error types for sim-core operations.

use std::fmt;

/// Result type for sim-core operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

/// Errors that can occur while clearing the market.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCoreError {
    /// No quotes were submitted this step.
    EmptyBook,
    /// A quote contained a NaN or infinite price point.
    NonFiniteQuote { sell: f64, buy: f64 },
}

impl fmt::Display for SimCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimCoreError::EmptyBook => write!(f, "quote book is empty"),
            SimCoreError::NonFiniteQuote { sell, buy } => {
                write!(f, "quote has non-finite price point (sell {}, buy {})", sell, buy)
            }
        }
    }
}

impl std::error::Error for SimCoreError {}
