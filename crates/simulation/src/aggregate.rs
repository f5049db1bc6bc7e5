//! Price aggregation: how one step's outcome becomes a market price.

use agents::Trader;
use types::Step;

use crate::error::{Result, SimulationError};

/// Turns the committed network state into the step's price.
pub trait PriceAggregator: Send {
    fn name(&self) -> &'static str;

    /// True if [`PriceAggregator::aggregate`] needs the rule's clearing price.
    fn needs_quote(&self) -> bool {
        false
    }

    /// Price for `step`, from the traders after commit and the clearing
    /// price of the step, if any.
    fn aggregate(&self, step: Step, traders: &[&Trader], quote: Option<f64>) -> Result<f64>;
}

impl<A: PriceAggregator + ?Sized> PriceAggregator for Box<A> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn needs_quote(&self) -> bool {
        (**self).needs_quote()
    }

    fn aggregate(&self, step: Step, traders: &[&Trader], quote: Option<f64>) -> Result<f64> {
        (**self).aggregate(step, traders, quote)
    }
}

/// Arithmetic mean of all signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSignal;

impl PriceAggregator for MeanSignal {
    fn name(&self) -> &'static str {
        "mean-signal"
    }

    fn aggregate(&self, _step: Step, traders: &[&Trader], _quote: Option<f64>) -> Result<f64> {
        if traders.is_empty() {
            return Err(SimulationError::EmptyNetwork);
        }
        let total: f64 = traders.iter().map(|t| t.signal()).sum();
        Ok(total / traders.len() as f64)
    }
}

/// The market clearing price found by the rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearingQuote;

impl PriceAggregator for ClearingQuote {
    fn name(&self) -> &'static str {
        "clearing-quote"
    }

    fn needs_quote(&self) -> bool {
        true
    }

    fn aggregate(&self, _step: Step, _traders: &[&Trader], quote: Option<f64>) -> Result<f64> {
        quote.ok_or(SimulationError::MissingQuote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::TraderId;

    #[test]
    fn test_mean_signal() {
        let a = Trader::new(TraderId(0), 1.0);
        let b = Trader::new(TraderId(1), 0.0);
        let c = Trader::new(TraderId(2), -0.4);
        let price = MeanSignal.aggregate(1, &[&a, &b, &c], Some(9.0)).unwrap();
        assert!((price - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_mean_signal_empty() {
        assert_eq!(
            MeanSignal.aggregate(1, &[], None),
            Err(SimulationError::EmptyNetwork)
        );
    }

    #[test]
    fn test_clearing_quote() {
        let a = Trader::new(TraderId(0), 1.0);
        assert_eq!(ClearingQuote.aggregate(1, &[&a], Some(3.5)), Ok(3.5));
        assert_eq!(
            ClearingQuote.aggregate(1, &[&a], None),
            Err(SimulationError::MissingQuote)
        );
    }
}
