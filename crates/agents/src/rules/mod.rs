//! Pluggable update rules.
//!
//! A rule decides every trader's next signal from the previous-step
//! snapshot of the trader and its successors. The simulator drives it
//! through a fixed per-step protocol:
//!
//! 1. [`UpdateRule::prepare`] on each trader (private draws only)
//! 2. [`UpdateRule::quote`] once, over all neighbourhoods, to optionally
//!    clear the market before anyone moves
//! 3. [`UpdateRule::next_state`] for each trader, reading the snapshot only
//!
//! Results of step 3 are buffered and committed together, so the order in
//! which traders are visited never changes the outcome.
//!
//! # Available Rules
//! - [`AveragingRule`] - weighted mean of own and neighbour signals
//! - [`InfluenceThresholdRule`] - buy/hold/sell thresholds with market clearing

mod averaging;
mod influence;

pub use averaging::AveragingRule;
pub use influence::InfluenceThresholdRule;

use rand::RngCore;
use sim_core::QuoteBook;
use smallvec::SmallVec;
use types::Step;

use crate::error::Result;
use crate::trader::{Trader, TraderUpdate};

/// A trader together with the traders it watches.
#[derive(Debug, Clone)]
pub struct Neighborhood<'a> {
    pub trader: &'a Trader,
    /// Successors in the network, in edge order.
    pub neighbors: SmallVec<[&'a Trader; 8]>,
}

impl<'a> Neighborhood<'a> {
    pub fn new(trader: &'a Trader, neighbors: impl IntoIterator<Item = &'a Trader>) -> Self {
        Self {
            trader,
            neighbors: neighbors.into_iter().collect(),
        }
    }

    /// Sum of neighbour signals.
    pub fn influence(&self) -> f64 {
        self.neighbors.iter().map(|n| n.signal()).sum()
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// Strategy computing a trader's next state.
pub trait UpdateRule: Send {
    /// Rule name for logging.
    fn name(&self) -> &'static str;

    /// True if [`UpdateRule::quote`] returns a clearing price.
    fn provides_quote(&self) -> bool {
        false
    }

    /// Reject traders the rule cannot drive. Called once before a run.
    fn validate(&self, _trader: &Trader) -> Result<()> {
        Ok(())
    }

    /// Per-trader preparation at the start of a step.
    fn prepare(&self, _step: Step, _trader: &mut Trader, _rng: &mut dyn RngCore) -> Result<()> {
        Ok(())
    }

    /// Optional market clearing from the previous-step snapshot.
    ///
    /// Returns the clearing price when the rule trades through the book.
    fn quote(
        &self,
        _step: Step,
        _view: &[Neighborhood<'_>],
        _book: &mut QuoteBook,
    ) -> Result<Option<f64>> {
        Ok(None)
    }

    /// Next state of `view.trader`. Must only read the snapshot.
    fn next_state(&self, step: Step, view: &Neighborhood<'_>, quote: Option<f64>) -> TraderUpdate;
}

impl<R: UpdateRule + ?Sized> UpdateRule for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn provides_quote(&self) -> bool {
        (**self).provides_quote()
    }

    fn validate(&self, trader: &Trader) -> Result<()> {
        (**self).validate(trader)
    }

    fn prepare(&self, step: Step, trader: &mut Trader, rng: &mut dyn RngCore) -> Result<()> {
        (**self).prepare(step, trader, rng)
    }

    fn quote(
        &self,
        step: Step,
        view: &[Neighborhood<'_>],
        book: &mut QuoteBook,
    ) -> Result<Option<f64>> {
        (**self).quote(step, view, book)
    }

    fn next_state(&self, step: Step, view: &Neighborhood<'_>, quote: Option<f64>) -> TraderUpdate {
        (**self).next_state(step, view, quote)
    }
}
