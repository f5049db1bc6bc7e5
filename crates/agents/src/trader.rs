//! Trader state.
//!
//! A trader is the node weight of the trader network. It carries its
//! investment signal, the fixed influence coefficients drawn at creation,
//! the per-step perception error, and a short memory of past signals,
//! perception errors and perceived prices.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use types::{Position, TraderId};

use crate::distributions::ParamSource;
use crate::error::Result;
use crate::memory::RoundRobin;

/// Influence coefficients of one trader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraderParams {
    /// Influence by asset price.
    pub a: f64,
    /// Influence by perceived price change.
    pub b: f64,
    /// Influence by neighbours.
    pub c: f64,
    /// Innate strategy.
    pub d: f64,
}

impl Default for TraderParams {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
        }
    }
}

/// Next-state value produced by an update rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraderUpdate {
    pub signal: f64,
    /// New perceived price, when the rule tracks one.
    pub perceived_price: Option<f64>,
}

impl TraderUpdate {
    pub fn signal(signal: f64) -> Self {
        Self {
            signal,
            perceived_price: None,
        }
    }
}

/// One participant of the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    id: TraderId,
    signal: f64,
    params: TraderParams,
    epsilon: f64,
    epsilon_source: ParamSource,
    perceived_price: f64,
    history: RoundRobin<f64>,
    epsilon_history: RoundRobin<f64>,
    perceived_history: RoundRobin<f64>,
}

impl Trader {
    /// Neutral deterministic trader with the given signal.
    pub fn new(id: TraderId, signal: f64) -> Self {
        Self {
            id,
            signal,
            params: TraderParams::default(),
            epsilon: 0.0,
            epsilon_source: ParamSource::Constant(0.0),
            perceived_price: 0.0,
            history: RoundRobin::filled(signal, 2),
            epsilon_history: RoundRobin::filled(0.0, 2),
            perceived_history: RoundRobin::filled(0.0, 2),
        }
    }

    pub fn with_params(mut self, params: TraderParams) -> Self {
        self.params = params;
        self
    }

    /// Set the perception error source and its first draw.
    pub fn with_epsilon(mut self, epsilon: f64, source: ParamSource) -> Self {
        self.epsilon = epsilon;
        self.epsilon_source = source;
        self.epsilon_history = RoundRobin::filled(epsilon, self.history.capacity());
        self
    }

    /// Resize the signal memory to `memory_length` past steps plus the current one.
    pub fn with_memory_length(mut self, memory_length: usize) -> Self {
        let capacity = memory_length + 1;
        self.history = RoundRobin::filled(self.signal, capacity);
        self.epsilon_history = RoundRobin::filled(self.epsilon, capacity);
        self.perceived_history = RoundRobin::filled(self.perceived_price, capacity);
        self
    }

    pub fn id(&self) -> TraderId {
        self.id
    }

    /// Current investment signal.
    pub fn signal(&self) -> f64 {
        self.signal
    }

    /// Current signal as a discrete position.
    pub fn position(&self) -> Position {
        Position::from_signal(self.signal)
    }

    pub fn params(&self) -> &TraderParams {
        &self.params
    }

    /// Perception error for the current step.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn epsilon_source(&self) -> &ParamSource {
        &self.epsilon_source
    }

    /// Market price plus this trader's error, as of the last step.
    pub fn perceived_price(&self) -> f64 {
        self.perceived_price
    }

    /// Past signals, oldest first, ending with the current one.
    pub fn history(&self) -> &RoundRobin<f64> {
        &self.history
    }

    /// Past perception errors, oldest first, ending with the current one.
    pub fn epsilon_history(&self) -> &RoundRobin<f64> {
        &self.epsilon_history
    }

    /// Past perceived prices, oldest first, ending with the current one.
    pub fn perceived_history(&self) -> &RoundRobin<f64> {
        &self.perceived_history
    }

    /// Draw a fresh perception error.
    pub fn resample_epsilon(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.epsilon = self
            .epsilon_source
            .sample("epsilon", self.id.index(), rng)?;
        self.epsilon_history.record(self.epsilon);
        Ok(())
    }

    /// Commit the result of an update rule.
    pub fn apply(&mut self, update: TraderUpdate) {
        self.signal = update.signal;
        self.history.record(update.signal);
        if let Some(price) = update.perceived_price {
            self.perceived_price = price;
            self.perceived_history.record(price);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_trader_is_neutral() {
        let trader = Trader::new(TraderId(4), 0.0);
        assert_eq!(trader.id(), TraderId(4));
        assert_eq!(trader.position(), Position::Hold);
        assert_eq!(trader.params().a, 1.0);
        assert_eq!(trader.epsilon(), 0.0);
    }

    #[test]
    fn test_apply_records_history() {
        let mut trader = Trader::new(TraderId(0), -1.0).with_memory_length(2);
        trader.apply(TraderUpdate::signal(1.0));
        trader.apply(TraderUpdate {
            signal: 0.0,
            perceived_price: Some(0.25),
        });

        assert_eq!(trader.signal(), 0.0);
        assert_eq!(trader.perceived_price(), 0.25);
        assert_eq!(
            trader.history().iter().copied().collect::<Vec<_>>(),
            vec![-1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_perceived_price_kept_without_update() {
        let mut trader = Trader::new(TraderId(0), 0.0);
        trader.apply(TraderUpdate {
            signal: 1.0,
            perceived_price: Some(2.0),
        });
        trader.apply(TraderUpdate::signal(0.0));
        assert_eq!(trader.perceived_price(), 2.0);
    }

    #[test]
    fn test_epsilon_and_perceived_price_remembered() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut trader = Trader::new(TraderId(0), 0.0)
            .with_epsilon(0.5, ParamSource::Constant(0.75))
            .with_memory_length(2);
        assert_eq!(trader.epsilon_history().capacity(), 3);
        assert_eq!(trader.epsilon_history().latest(), Some(&0.5));

        trader.resample_epsilon(&mut rng).unwrap();
        trader.apply(TraderUpdate {
            signal: 1.0,
            perceived_price: Some(1.25),
        });
        trader.apply(TraderUpdate {
            signal: 0.0,
            perceived_price: Some(2.0),
        });

        assert_eq!(
            trader.epsilon_history().iter().copied().collect::<Vec<_>>(),
            vec![0.5, 0.5, 0.75]
        );
        assert_eq!(
            trader.perceived_history().iter().copied().collect::<Vec<_>>(),
            vec![0.0, 1.25, 2.0]
        );
        assert_eq!(trader.perceived_history().get(1), Some(&1.25));
    }

    #[test]
    fn test_resample_epsilon() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut trader =
            Trader::new(TraderId(0), 0.0).with_epsilon(0.0, ParamSource::normal(0.0, 0.33));
        let draws: Vec<f64> = (0..20)
            .map(|_| {
                trader.resample_epsilon(&mut rng).unwrap();
                trader.epsilon()
            })
            .collect();
        assert!(draws.iter().any(|&e| e != draws[0]));
    }
}
