//! Weighted-average belief update.

use serde::{Deserialize, Serialize};
use types::Step;

use super::{Neighborhood, UpdateRule};
use crate::error::{AgentError, Result};
use crate::trader::{Trader, TraderUpdate};

/// New signal = `(w * own + sum of neighbour signals) / (w + k)`.
///
/// A trader without successors keeps its signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AveragingRule {
    pub self_weight: f64,
}

impl Default for AveragingRule {
    fn default() -> Self {
        Self { self_weight: 1.0 }
    }
}

impl AveragingRule {
    pub fn new(self_weight: f64) -> Self {
        Self { self_weight }
    }
}

impl UpdateRule for AveragingRule {
    fn name(&self) -> &'static str {
        "averaging"
    }

    fn validate(&self, trader: &Trader) -> Result<()> {
        if !self.self_weight.is_finite() || self.self_weight < 0.0 {
            return Err(AgentError::InvalidRule {
                trader: trader.id(),
                reason: format!("self weight {} must be finite and >= 0", self.self_weight),
            });
        }
        Ok(())
    }

    fn next_state(&self, _step: Step, view: &Neighborhood<'_>, _quote: Option<f64>) -> TraderUpdate {
        let own = view.trader.signal();
        let k = view.degree() as f64;
        let weight = self.self_weight + k;
        if view.neighbors.is_empty() || weight == 0.0 {
            return TraderUpdate::signal(own);
        }
        TraderUpdate::signal((self.self_weight * own + view.influence()) / weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::TraderId;

    fn trader(id: usize, signal: f64) -> Trader {
        Trader::new(TraderId(id), signal)
    }

    #[test]
    fn test_isolated_trader_unchanged() {
        let t = trader(0, 0.7);
        let view = Neighborhood::new(&t, []);
        assert_eq!(AveragingRule::default().next_state(1, &view, None).signal, 0.7);
    }

    #[test]
    fn test_mean_with_neighbours() {
        let me = trader(0, 1.0);
        let a = trader(1, 0.0);
        let b = trader(2, -1.0);
        let view = Neighborhood::new(&me, [&a, &b]);

        assert_eq!(AveragingRule::default().next_state(1, &view, None).signal, 0.0);
        // w = 2: (2 * 1 + 0 - 1) / 4
        assert_eq!(AveragingRule::new(2.0).next_state(1, &view, None).signal, 0.25);
        // w = 0: plain neighbour mean
        assert_eq!(AveragingRule::new(0.0).next_state(1, &view, None).signal, -0.5);
    }

    #[test]
    fn test_uniform_neighbourhood_is_fixed_point() {
        let me = trader(0, 0.5);
        let other = trader(1, 0.5);
        let view = Neighborhood::new(&me, [&other]);
        let update = AveragingRule::default().next_state(1, &view, None);
        assert_eq!(update.signal, 0.5);
        assert_eq!(update.perceived_price, None);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let rule = AveragingRule::new(-1.0);
        assert!(matches!(
            rule.validate(&trader(3, 0.0)),
            Err(AgentError::InvalidRule { trader: TraderId(3), .. })
        ));
    }
}
