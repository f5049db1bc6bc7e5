//! MetricsHook - built-in hook aggregating price statistics.
//!
//! Collects the price of every step and summarises the series: level,
//! volatility of step-to-step changes, extremes, and how many quotes the
//! market cleared.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sim_core::QuoteBookSnapshot;
use types::Step;

use crate::hooks::SimulationHook;
use crate::runner::{SimulationStats, StepRecord};
use crate::stats;

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total steps processed.
    pub total_steps: u64,
    /// Total quotes submitted to the book.
    pub total_quotes: u64,
    /// Mean price over the recent window.
    pub mean_price: Option<f64>,
    /// Standard deviation of step-to-step price changes in the recent window.
    pub price_volatility: Option<f64>,
    /// Lowest price of the whole run.
    pub min_price: Option<f64>,
    /// Highest price of the whole run.
    pub max_price: Option<f64>,
    pub last_price: Option<f64>,
    /// Sellers minus buyers at the last clearing price.
    pub last_imbalance: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
struct PriceRange {
    min: f64,
    max: f64,
    last: f64,
}

/// Built-in hook for collecting price metrics.
///
/// Thread-safe via atomics and mutex for interior mutability.
///
/// # Example
///
/// ```ignore
/// use simulation::{MetricsHook, Simulation};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsHook::new());
/// sim.add_hook(metrics.clone());
/// sim.run(1..=100)?;
/// println!("volatility: {:?}", metrics.snapshot().price_volatility);
/// ```
pub struct MetricsHook {
    step_count: AtomicU64,
    quote_count: AtomicU64,
    /// Most recent prices, at most `max_history`.
    price_history: Mutex<VecDeque<f64>>,
    /// Whole-run price summary, independent of `max_history`.
    range: Mutex<Option<PriceRange>>,
    last_imbalance: Mutex<Option<i64>>,
    max_history: usize,
}

impl MetricsHook {
    /// Create a new metrics hook with default settings.
    pub fn new() -> Self {
        Self::with_max_history(10_000)
    }

    /// Create a metrics hook with custom history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            step_count: AtomicU64::new(0),
            quote_count: AtomicU64::new(0),
            price_history: Mutex::new(VecDeque::with_capacity(max_history.min(10_000))),
            range: Mutex::new(None),
            last_imbalance: Mutex::new(None),
            max_history,
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut history = self.price_history.lock();
        let prices = history.make_contiguous();
        let changes = stats::price_changes(prices);
        let range = *self.range.lock();

        MetricsSnapshot {
            total_steps: self.step_count.load(Ordering::Relaxed),
            total_quotes: self.quote_count.load(Ordering::Relaxed),
            mean_price: stats::mean(prices),
            price_volatility: stats::std_dev(&changes),
            min_price: range.map(|r| r.min),
            max_price: range.map(|r| r.max),
            last_price: range.map(|r| r.last),
            last_imbalance: *self.last_imbalance.lock(),
        }
    }

    /// Most recent prices, oldest first.
    pub fn price_history(&self) -> Vec<f64> {
        self.price_history.lock().iter().copied().collect()
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.step_count.store(0, Ordering::Relaxed);
        self.quote_count.store(0, Ordering::Relaxed);
        self.price_history.lock().clear();
        *self.range.lock() = None;
        *self.last_imbalance.lock() = None;
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_quotes(&self, _step: Step, book: QuoteBookSnapshot) {
        self.quote_count
            .fetch_add(book.sell_prices.len() as u64, Ordering::Relaxed);
    }

    fn on_step_end(&self, record: &StepRecord, _stats: &SimulationStats) {
        self.step_count.fetch_add(1, Ordering::Relaxed);
        if record.imbalance.is_some() {
            *self.last_imbalance.lock() = record.imbalance;
        }

        {
            let mut range = self.range.lock();
            let price = record.price;
            *range = Some(match *range {
                Some(r) => PriceRange {
                    min: r.min.min(price),
                    max: r.max.max(price),
                    last: price,
                },
                None => PriceRange {
                    min: price,
                    max: price,
                    last: price,
                },
            });
        }

        if self.max_history == 0 {
            return;
        }
        let mut history = self.price_history.lock();
        if history.len() == self.max_history {
            history.pop_front();
        }
        history.push_back(record.price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookRunner;
    use std::sync::Arc;

    fn record(step: Step, price: f64) -> StepRecord {
        StepRecord {
            step,
            price,
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_accumulation() {
        let metrics = Arc::new(MetricsHook::new());
        let mut runner = HookRunner::new();
        runner.add(metrics.clone());
        let stats = SimulationStats::default();

        for (step, price) in [(1, 1.0), (2, 3.0), (3, 2.0)] {
            runner.on_step_end(&record(step, price), &stats);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_steps, 3);
        assert_eq!(snapshot.mean_price, Some(2.0));
        assert_eq!(snapshot.min_price, Some(1.0));
        assert_eq!(snapshot.max_price, Some(3.0));
        assert_eq!(snapshot.last_price, Some(2.0));
        // changes +2, -1: std dev 1.5
        assert_eq!(snapshot.price_volatility, Some(1.5));
    }

    #[test]
    fn test_quotes_and_imbalance() {
        let metrics = MetricsHook::new();
        let stats = SimulationStats::default();
        let book = QuoteBookSnapshot {
            sell_prices: vec![1.0, 2.0, 3.0],
            buy_prices: vec![0.0, 1.0, 2.0],
            price: 1.5,
        };

        metrics.on_quotes(1, book);
        metrics.on_step_end(
            &StepRecord {
                imbalance: Some(0),
                ..record(1, 1.5)
            },
            &stats,
        );
        // A later step without quotes keeps the last imbalance.
        metrics.on_step_end(&record(2, 1.5), &stats);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_quotes, 3);
        assert_eq!(snapshot.last_imbalance, Some(0));
    }

    #[test]
    fn test_history_keeps_latest_prices() {
        let metrics = MetricsHook::with_max_history(3);
        let stats = SimulationStats::default();
        for step in 1..=5 {
            metrics.on_step_end(&record(step, step as f64), &stats);
        }

        assert_eq!(metrics.price_history(), vec![3.0, 4.0, 5.0]);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_steps, 5);
        assert_eq!(snapshot.last_price, Some(5.0));
        assert_eq!(snapshot.mean_price, Some(4.0));
        // Extremes cover the whole run, not just the window.
        assert_eq!(snapshot.min_price, Some(1.0));
        assert_eq!(snapshot.max_price, Some(5.0));
    }

    #[test]
    fn test_zero_history_still_tracks_range() {
        let metrics = MetricsHook::with_max_history(0);
        let stats = SimulationStats::default();
        metrics.on_step_end(&record(1, -2.0), &stats);
        metrics.on_step_end(&record(2, 7.0), &stats);

        let snapshot = metrics.snapshot();
        assert!(metrics.price_history().is_empty());
        assert_eq!(snapshot.mean_price, None);
        assert_eq!(snapshot.last_price, Some(7.0));
        assert_eq!(snapshot.min_price, Some(-2.0));
        assert_eq!(snapshot.max_price, Some(7.0));
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsHook::new();
        metrics.on_step_end(&record(1, 1.0), &SimulationStats::default());
        assert_eq!(metrics.snapshot().total_steps, 1);

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
