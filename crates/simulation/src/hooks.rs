//! Simulation hooks for observing the step loop.
//!
//! Hooks are **observers**: they receive owned snapshots or shared
//! references to finished records and cannot modify the network.
//!
//! # Example
//!
//! ```ignore
//! use simulation::{SimulationHook, StepRecord, SimulationStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! struct SellPressure {
//!     steps_above_zero: AtomicU64,
//! }
//!
//! impl SimulationHook for SellPressure {
//!     fn name(&self) -> &str { "SellPressure" }
//!
//!     fn on_step_end(&self, record: &StepRecord, _stats: &SimulationStats) {
//!         if record.mean_signal > 0.0 {
//!             self.steps_above_zero.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! }
//! ```

use std::sync::Arc;

use sim_core::QuoteBookSnapshot;
use types::Step;

use crate::runner::{SimulationStats, StepRecord};

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for simulation observers.
///
/// Use interior mutability (`Mutex`, atomics) for hook-owned state.
///
/// # Lifecycle
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │  one step                                                    │
/// │                                                              │
/// │  on_step_start()  ← before any trader is touched             │
/// │        ▼                                                     │
/// │  on_quotes()      ← after clearing, only if quotes were sent │
/// │        ▼                                                     │
/// │  on_step_end()    ← after commit, with the step's price      │
/// └──────────────────────────────────────────────────────────────┘
///        ▼ (after all steps)
///  on_simulation_end()
/// ```
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    #[allow(unused_variables)]
    fn on_step_start(&self, step: Step) {}

    /// Receives an owned copy of the cleared quote book.
    #[allow(unused_variables)]
    fn on_quotes(&self, step: Step, book: QuoteBookSnapshot) {}

    #[allow(unused_variables)]
    fn on_step_end(&self, record: &StepRecord, stats: &SimulationStats) {}

    /// Called once when a run completes.
    #[allow(unused_variables)]
    fn on_simulation_end(&self, final_stats: &SimulationStats) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Calls registered hooks in registration order.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_step_start(&self, step: Step) {
        for hook in &self.hooks {
            hook.on_step_start(step);
        }
    }

    /// Each hook gets its own snapshot clone.
    pub fn on_quotes(&self, step: Step, book: &QuoteBookSnapshot) {
        for hook in &self.hooks {
            hook.on_quotes(step, book.clone());
        }
    }

    pub fn on_step_end(&self, record: &StepRecord, stats: &SimulationStats) {
        for hook in &self.hooks {
            hook.on_step_end(record, stats);
        }
    }

    pub fn on_simulation_end(&self, final_stats: &SimulationStats) {
        for hook in &self.hooks {
            hook.on_simulation_end(final_stats);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingHook {
        step_starts: AtomicU64,
        step_ends: AtomicU64,
        quotes_seen: AtomicU64,
    }

    impl CountingHook {
        fn new() -> Self {
            Self {
                step_starts: AtomicU64::new(0),
                step_ends: AtomicU64::new(0),
                quotes_seen: AtomicU64::new(0),
            }
        }
    }

    impl SimulationHook for CountingHook {
        fn name(&self) -> &str {
            "CountingHook"
        }

        fn on_step_start(&self, _step: Step) {
            self.step_starts.fetch_add(1, Ordering::Relaxed);
        }

        fn on_quotes(&self, _step: Step, book: QuoteBookSnapshot) {
            self.quotes_seen
                .fetch_add(book.sell_prices.len() as u64, Ordering::Relaxed);
        }

        fn on_step_end(&self, _record: &StepRecord, _stats: &SimulationStats) {
            self.step_ends.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_hook_runner_invocation() {
        let hook = Arc::new(CountingHook::new());
        let mut runner = HookRunner::new();
        runner.add(hook.clone());

        let record = StepRecord::default();
        let stats = SimulationStats::default();
        let book = QuoteBookSnapshot {
            sell_prices: vec![1.0, 2.0],
            buy_prices: vec![-1.0, 0.0],
            price: 0.5,
        };

        runner.on_step_start(1);
        runner.on_step_start(2);
        runner.on_quotes(2, &book);
        runner.on_step_end(&record, &stats);

        assert_eq!(hook.step_starts.load(Ordering::Relaxed), 2);
        assert_eq!(hook.quotes_seen.load(Ordering::Relaxed), 2);
        assert_eq!(hook.step_ends.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_multiple_hooks() {
        let hook1 = Arc::new(CountingHook::new());
        let hook2 = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        runner.add(hook1.clone());
        runner.add(hook2.clone());
        runner.on_step_start(1);

        assert_eq!(hook1.step_starts.load(Ordering::Relaxed), 1);
        assert_eq!(hook2.step_starts.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_hook_names() {
        let mut runner = HookRunner::new();
        runner.add(Arc::new(NoOpHook));
        runner.add(Arc::new(CountingHook::new()));

        assert_eq!(runner.hook_names(), vec!["NoOp", "CountingHook"]);
        assert_eq!(runner.len(), 2);
    }
}
