//! Trader construction settings.
//!
//! [`TraderConfig`] lists one [`ParamSource`] per trader attribute. Building
//! a network draws every attribute once per trader, in node index order and
//! always in the same attribute order, so a seeded RNG reproduces the same
//! population.
//!
//! # Presets
//!
//! - [`TraderConfig::default`]: neutral, deterministic traders (signal 0,
//!   A = 1, B = C = D = 0, no perception error)
//! - [`TraderConfig::paper`]: the published social-network investment model
//!   defaults

use rand::RngCore;
use serde::{Deserialize, Serialize};
use types::TraderId;

use crate::distributions::ParamSource;
use crate::error::{AgentError, Result};
use crate::trader::{Trader, TraderParams};

// =============================================================================
// TraderConfig
// =============================================================================

/// Sources for every trader attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraderConfig {
    /// Influence by asset price.
    pub a: ParamSource,
    /// Influence by perceived price change.
    pub b: ParamSource,
    /// Influence by neighbours.
    pub c: ParamSource,
    /// Innate strategy.
    pub d: ParamSource,
    /// Initial investment signal.
    pub initial_signal: ParamSource,
    /// Perception error, redrawn every step.
    pub epsilon: ParamSource,

    // ─── Memory ────────────────────────────────────────────────────────────
    /// Past steps remembered per trader. Observation only.
    pub memory_length: usize,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            a: ParamSource::Constant(1.0),
            b: ParamSource::Constant(0.0),
            c: ParamSource::Constant(0.0),
            d: ParamSource::Constant(0.0),
            initial_signal: ParamSource::Constant(0.0),
            epsilon: ParamSource::Constant(0.0),
            memory_length: 1,
        }
    }
}

impl TraderConfig {
    /// Bakker et al. (2010) defaults.
    pub fn paper() -> Self {
        Self {
            a: ParamSource::Constant(1.0),
            b: ParamSource::normal(0.0, 1.0),
            c: ParamSource::normal(5.0, 2.0),
            d: ParamSource::normal(0.0, 1.0),
            initial_signal: ParamSource::buy_hold_sell(),
            epsilon: ParamSource::normal(0.0, 0.33),
            memory_length: 1,
        }
    }

    pub fn with_a(mut self, source: impl Into<ParamSource>) -> Self {
        self.a = source.into();
        self
    }

    pub fn with_b(mut self, source: impl Into<ParamSource>) -> Self {
        self.b = source.into();
        self
    }

    pub fn with_c(mut self, source: impl Into<ParamSource>) -> Self {
        self.c = source.into();
        self
    }

    pub fn with_d(mut self, source: impl Into<ParamSource>) -> Self {
        self.d = source.into();
        self
    }

    pub fn with_initial_signal(mut self, source: impl Into<ParamSource>) -> Self {
        self.initial_signal = source.into();
        self
    }

    pub fn with_epsilon(mut self, source: impl Into<ParamSource>) -> Self {
        self.epsilon = source.into();
        self
    }

    pub fn with_memory_length(mut self, memory_length: usize) -> Self {
        self.memory_length = memory_length;
        self
    }

    /// Check every source can serve `traders` traders.
    pub fn validate(&self, traders: usize) -> Result<()> {
        if self.memory_length == 0 {
            return Err(AgentError::ZeroMemory);
        }
        for (name, source) in self.sources() {
            source.validate(name, traders)?;
        }
        Ok(())
    }

    /// Build the trader for the node at `index`.
    pub fn build_trader(&self, index: usize, rng: &mut dyn RngCore) -> Result<Trader> {
        let params = TraderParams {
            a: self.a.sample("a", index, rng)?,
            b: self.b.sample("b", index, rng)?,
            c: self.c.sample("c", index, rng)?,
            d: self.d.sample("d", index, rng)?,
        };
        let signal = self.initial_signal.sample("initial_signal", index, rng)?;
        let epsilon = self.epsilon.sample("epsilon", index, rng)?;
        let epsilon_source = self.epsilon.for_trader("epsilon", index)?;

        Ok(Trader::new(TraderId(index), signal)
            .with_params(params)
            .with_epsilon(epsilon, epsilon_source)
            .with_memory_length(self.memory_length))
    }

    /// True if building traders never consumes randomness.
    pub fn is_deterministic(&self) -> bool {
        self.sources().iter().all(|(_, s)| s.is_deterministic())
    }

    fn sources(&self) -> [(&'static str, &ParamSource); 6] {
        [
            ("a", &self.a),
            ("b", &self.b),
            ("c", &self.c),
            ("d", &self.d),
            ("initial_signal", &self.initial_signal),
            ("epsilon", &self.epsilon),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_builds_neutral_trader() {
        let config = TraderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let trader = config.build_trader(3, &mut rng).unwrap();

        assert!(config.is_deterministic());
        assert_eq!(trader.id(), TraderId(3));
        assert_eq!(trader.signal(), 0.0);
        assert_eq!(*trader.params(), TraderParams::default());
        assert_eq!(trader.history().capacity(), 2);
    }

    #[test]
    fn test_paper_population_is_reproducible() {
        let config = TraderConfig::paper();
        assert!(!config.is_deterministic());

        let build = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|i| config.build_trader(i, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(build(11), build(11));
        assert_ne!(build(11), build(12));
    }

    #[test]
    fn test_paper_initial_signals_are_positions() {
        let config = TraderConfig::paper();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..50 {
            let s = config.build_trader(i, &mut rng).unwrap().signal();
            assert!(s == -1.0 || s == 0.0 || s == 1.0);
        }
    }

    #[test]
    fn test_per_trader_values_follow_index() {
        let config = TraderConfig::default()
            .with_initial_signal(ParamSource::PerTrader(vec![0.1, 0.2, 0.3]))
            .with_epsilon(ParamSource::PerTrader(vec![1.0, 2.0, 3.0]));
        let mut rng = StdRng::seed_from_u64(0);
        let trader = config.build_trader(1, &mut rng).unwrap();

        assert_eq!(trader.signal(), 0.2);
        assert_eq!(trader.epsilon(), 2.0);
        assert_eq!(trader.epsilon_source(), &ParamSource::Constant(2.0));
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            TraderConfig::default().with_memory_length(0).validate(1),
            Err(AgentError::ZeroMemory)
        );
        assert!(
            TraderConfig::default()
                .with_d(ParamSource::PerTrader(vec![0.0]))
                .validate(2)
                .is_err()
        );
        assert!(TraderConfig::paper().validate(100).is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TraderConfig =
            serde_json::from_str(r#"{"c": {"normal": {"mean": 5.0, "std_dev": 2.0}}}"#).unwrap();
        assert_eq!(config.c, ParamSource::normal(5.0, 2.0));
        assert_eq!(config.a, ParamSource::Constant(1.0));
        assert_eq!(config.memory_length, 1);
    }
}
