//! Influence-threshold rule of the social-network investment model
//! (Bakker, Hare, Khosravi, Ramadanovic 2010).
//!
//! Each trader combines the price level, its perceived price change, its
//! neighbours' positions and an innate bias into the pressure
//!
//! ```text
//! K = (A + B) * eps_t - B * perceived_{t-1} + C * sum(neighbour signals_{t-1}) + D
//! ```
//!
//! and quotes a sell point `p_s = (1 - K) / (A + B)` and a buy point
//! `p_b = (-1 - K) / (A + B)`. The market clears at `p`, every trader
//! perceives `p + eps_t`, and moves to
//!
//! - buy (-1) if `L < -1`
//! - hold (0) if `-1 <= L <= 1`
//! - sell (+1) if `L > 1`
//!
//! with `L = (A + B) * p + K`.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sim_core::{Quote, QuoteBook};
use tracing::warn;
use types::Step;

use super::{Neighborhood, UpdateRule};
use crate::error::{AgentError, Result};
use crate::trader::{Trader, TraderUpdate};

/// Buy/hold/sell rule with market clearing through the quote book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfluenceThresholdRule {
    /// L below this means buy.
    pub buy_threshold: f64,
    /// L above this means sell.
    pub sell_threshold: f64,
}

impl Default for InfluenceThresholdRule {
    fn default() -> Self {
        Self {
            buy_threshold: -1.0,
            sell_threshold: 1.0,
        }
    }
}

impl InfluenceThresholdRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pressure `K` on a trader from the previous-step snapshot.
    pub fn pressure(view: &Neighborhood<'_>) -> f64 {
        let t = view.trader;
        let p = t.params();
        (p.a + p.b) * t.epsilon() - p.b * t.perceived_price() + p.c * view.influence() + p.d
    }

    /// Sell and buy points of one trader.
    pub fn quote_for(&self, view: &Neighborhood<'_>) -> Quote {
        let k = Self::pressure(view);
        let p = view.trader.params();
        let slope = p.a + p.b;
        Quote::new(
            (self.sell_threshold - k) / slope,
            (self.buy_threshold - k) / slope,
        )
    }
}

impl UpdateRule for InfluenceThresholdRule {
    fn name(&self) -> &'static str {
        "influence-threshold"
    }

    fn provides_quote(&self) -> bool {
        true
    }

    fn validate(&self, trader: &Trader) -> Result<()> {
        if self.buy_threshold > self.sell_threshold {
            return Err(AgentError::InvalidRule {
                trader: trader.id(),
                reason: format!(
                    "buy threshold {} above sell threshold {}",
                    self.buy_threshold, self.sell_threshold
                ),
            });
        }
        let slope = trader.params().a + trader.params().b;
        if slope == 0.0 || !slope.is_finite() {
            return Err(AgentError::InvalidRule {
                trader: trader.id(),
                reason: format!("A + B = {slope} leaves price points undefined"),
            });
        }
        Ok(())
    }

    fn prepare(&self, _step: Step, trader: &mut Trader, rng: &mut dyn RngCore) -> Result<()> {
        trader.resample_epsilon(rng)
    }

    fn quote(
        &self,
        step: Step,
        view: &[Neighborhood<'_>],
        book: &mut QuoteBook,
    ) -> Result<Option<f64>> {
        for neighborhood in view {
            let quote = self.quote_for(neighborhood);
            if quote.is_inverted() {
                let p = neighborhood.trader.params();
                warn!(
                    step,
                    trader = %neighborhood.trader.id(),
                    sell = quote.sell,
                    buy = quote.buy,
                    a_plus_b = p.a + p.b,
                    "buy point above sell point"
                );
            }
            book.insert(quote)?;
        }
        Ok(Some(book.clearing_price()?))
    }

    fn next_state(&self, _step: Step, view: &Neighborhood<'_>, quote: Option<f64>) -> TraderUpdate {
        let t = view.trader;
        let Some(price) = quote else {
            return TraderUpdate::signal(t.signal());
        };
        let p = t.params();
        let level = (p.a + p.b) * price + Self::pressure(view);
        let signal = if level < self.buy_threshold {
            -1.0
        } else if level <= self.sell_threshold {
            0.0
        } else {
            1.0
        };
        TraderUpdate {
            signal,
            perceived_price: Some(price + t.epsilon()),
        }
    }
}
