//! Simulation configuration options.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::Simulation`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed for per-step draws. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Reference price before the first clearing.
    pub initial_price: f64,

    /// Maximum number of prices kept in the runner's history.
    pub max_price_history: usize,

    /// Log every step at info level instead of debug.
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_price: 0.0,
            max_price_history: 10_000,
            verbose: false,
        }
    }
}

impl SimulationConfig {
    /// Configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_price(mut self, price: f64) -> Self {
        self.initial_price = price;
        self
    }

    pub fn with_max_price_history(mut self, max: usize) -> Self {
        self.max_price_history = max;
        self
    }

    /// Enable verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
