//! Simulation crate: the step loop for the trader network market.
//!
//! This crate provides:
//! - [`simulate_prices`]: run a borrowed network for a sequence of steps
//! - [`evolve`]: the same, lazily, one `(step, price)` at a time
//! - [`simulate_and_distill`]: collect caller-chosen data after every step
//! - [`Simulation`]: an owning runner with a seeded RNG, stats and hooks
//! - Price aggregators ([`MeanSignal`], [`ClearingQuote`])
//!
//! # Architecture
//!
//! Updates are synchronous: every trader's next state is computed from the
//! previous step's snapshot, buffered, and committed at once. Update rules
//! (`agents::UpdateRule`) and price aggregators ([`PriceAggregator`]) are
//! injected, not hard-coded.
//!
//! # Hooks
//!
//! ```ignore
//! use simulation::{MetricsHook, Simulation, SimulationConfig, MeanSignal};
//! use agents::AveragingRule;
//! use std::sync::Arc;
//!
//! let mut sim = Simulation::new(network, AveragingRule::default(), MeanSignal,
//!     SimulationConfig::seeded(42))?;
//! let metrics = Arc::new(MetricsHook::new());
//! sim.add_hook(metrics.clone());
//!
//! sim.run(1..=1000)?;
//! println!("mean price: {:?}", metrics.snapshot().mean_price);
//! ```

mod aggregate;
pub mod config;
mod error;
mod hooks;
mod metrics;
mod prices;
mod runner;
pub mod stats;

pub use aggregate::{ClearingQuote, MeanSignal, PriceAggregator};
pub use config::SimulationConfig;
pub use error::{Result, SimulationError};
pub use hooks::{HookRunner, NoOpHook, SimulationHook};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use prices::{Distilled, Evolve, evolve, simulate_and_distill, simulate_prices};
pub use runner::{Simulation, SimulationStats, StepRecord};
