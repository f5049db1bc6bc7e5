//! Agents crate: traders and update rules for the trader network simulation.
//!
//! This crate provides:
//! - [`Trader`]: node state (signal, influence coefficients, perception error, memory)
//! - [`TraderConfig`]: per-attribute [`ParamSource`]s used to build traders
//! - [`UpdateRule`]: the strategy deciding each trader's next state
//! - Concrete rules in the [`rules`] module
//!
//! # Architecture
//! Rules never mutate the network directly. Each step they read a snapshot
//! ([`Neighborhood`]: a trader plus its successors) and return a
//! [`TraderUpdate`]; the simulator buffers and commits the updates.
//!
//! # Example
//! ```ignore
//! use agents::{AveragingRule, Neighborhood, Trader, UpdateRule};
//! use types::TraderId;
//!
//! let me = Trader::new(TraderId(0), 1.0);
//! let other = Trader::new(TraderId(1), 0.0);
//! let view = Neighborhood::new(&me, [&other]);
//! let update = AveragingRule::default().next_state(1, &view, None);
//! assert_eq!(update.signal, 0.5);
//! ```

mod config;
mod distributions;
mod error;
mod memory;
pub mod rules;
mod trader;

pub use config::TraderConfig;
pub use distributions::ParamSource;
pub use error::{AgentError, Result};
pub use memory::RoundRobin;
pub use rules::{AveragingRule, InfluenceThresholdRule, Neighborhood, UpdateRule};
pub use trader::{Trader, TraderParams, TraderUpdate};
