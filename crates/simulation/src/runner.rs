//! Simulation runner implementing the synchronous step loop.
//!
//! Every step:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  1. Hook: on_step_start                              │
//! │  2. rule.prepare() per trader (private draws)        │
//! │  3. rule.quote() over the previous-step snapshot     │
//! │  4. Hook: on_quotes (if any quote was submitted)     │
//! │  5. rule.next_state() per trader into a buffer       │
//! │  6. Commit the buffer                                │
//! │  7. aggregator.aggregate() → step price              │
//! │  8. Hook: on_step_end                                │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 3 and 5 only ever see the state committed by the previous step, so
//! trader visiting order does not affect the outcome.

use std::collections::VecDeque;
use std::sync::Arc;

use agents::{Trader, TraderUpdate, UpdateRule};
use network::TraderNetwork;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sim_core::QuoteBook;
use tracing::{debug, info};
use types::Step;

use crate::aggregate::PriceAggregator;
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::hooks::{HookRunner, SimulationHook};

/// Outcome of one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    pub price: f64,
    /// Mean trader signal after commit.
    pub mean_signal: f64,
    /// Sellers minus buyers at the clearing price, when the market cleared.
    pub imbalance: Option<i64>,
    /// Quotes submitted this step.
    pub quotes: usize,
}

/// Statistics about the simulation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Steps completed.
    pub steps: u64,
    /// Label of the last completed step.
    pub last_step: Option<Step>,
    pub last_price: Option<f64>,
    /// Total quotes submitted.
    pub total_quotes: u64,
    /// Number of traders.
    pub traders: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Step Loop
// ─────────────────────────────────────────────────────────────────────────────

/// Reject runs that cannot complete, before any trader is touched.
pub(crate) fn validate<L, R, A>(network: &TraderNetwork<L>, rule: &R, aggregator: &A) -> Result<()>
where
    R: UpdateRule + ?Sized,
    A: PriceAggregator + ?Sized,
{
    if network.is_empty() {
        return Err(SimulationError::EmptyNetwork);
    }
    if aggregator.needs_quote() && !rule.provides_quote() {
        return Err(SimulationError::MissingQuote);
    }
    for trader in network.traders() {
        rule.validate(trader)?;
    }
    Ok(())
}

/// Advance the network by one step and return its record.
pub(crate) fn advance<L, R, A>(
    network: &mut TraderNetwork<L>,
    book: &mut QuoteBook,
    rule: &R,
    aggregator: &A,
    rng: &mut dyn RngCore,
    step: Step,
    hooks: Option<&HookRunner>,
) -> Result<StepRecord>
where
    R: UpdateRule + ?Sized,
    A: PriceAggregator + ?Sized,
{
    if let Some(hooks) = hooks {
        hooks.on_step_start(step);
    }

    for trader in network.traders_mut() {
        rule.prepare(step, trader, rng)?;
    }

    book.clear();
    let (quote, updates) = {
        let view = network.neighborhoods();
        let quote = rule.quote(step, &view, book)?;
        let updates: Vec<TraderUpdate> = view
            .iter()
            .map(|neighborhood| rule.next_state(step, neighborhood, quote))
            .collect();
        (quote, updates)
    };

    if let Some(hooks) = hooks {
        if !book.is_empty() {
            hooks.on_quotes(step, &book.snapshot());
        }
    }

    network.commit(updates);

    let traders: Vec<&Trader> = network.traders().collect();
    let price = aggregator.aggregate(step, &traders, quote)?;

    let record = StepRecord {
        step,
        price,
        mean_signal: network.mean_signal().unwrap_or(0.0),
        imbalance: quote.map(|p| book.imbalance_at(p)),
        quotes: book.len(),
    };
    debug!(
        step,
        price,
        mean_signal = record.mean_signal,
        quotes = record.quotes,
        "step complete"
    );
    Ok(record)
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulation
// ─────────────────────────────────────────────────────────────────────────────

/// Owning simulation runner.
///
/// Holds the network, the update rule, the price aggregator, a seeded RNG,
/// the quote book carried from step to step, and registered hooks.
///
/// Rule and aggregator default to boxed trait objects so they can be
/// picked at runtime.
pub struct Simulation<L, R = Box<dyn UpdateRule>, A = Box<dyn PriceAggregator>> {
    config: SimulationConfig,
    network: TraderNetwork<L>,
    rule: R,
    aggregator: A,
    book: QuoteBook,
    rng: StdRng,
    hooks: HookRunner,
    stats: SimulationStats,
    /// Recent prices, bounded by `config.max_price_history`.
    price_history: VecDeque<f64>,
}

impl<L, R, A> Simulation<L, R, A>
where
    R: UpdateRule,
    A: PriceAggregator,
{
    /// Create a runner. The network and rule are validated up front.
    pub fn new(
        network: TraderNetwork<L>,
        rule: R,
        aggregator: A,
        config: SimulationConfig,
    ) -> Result<Self> {
        validate(&network, &rule, &aggregator)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let stats = SimulationStats {
            traders: network.len(),
            ..Default::default()
        };

        Ok(Self {
            book: QuoteBook::with_reference_price(config.initial_price),
            price_history: VecDeque::with_capacity(config.max_price_history.min(10_000)),
            config,
            network,
            rule,
            aggregator,
            rng,
            hooks: HookRunner::new(),
            stats,
        })
    }

    /// Register an observer. Hooks are called in registration order.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn network(&self) -> &TraderNetwork<L> {
        &self.network
    }

    /// The quote book as left by the last step.
    pub fn book(&self) -> &QuoteBook {
        &self.book
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Recent prices, oldest first.
    pub fn price_history(&self) -> impl Iterator<Item = f64> + '_ {
        self.price_history.iter().copied()
    }

    /// Label the next [`Simulation::step`] will use.
    ///
    /// `None` once the last step was labelled `Step::MAX`.
    pub fn next_step(&self) -> Option<Step> {
        match self.stats.last_step {
            Some(step) => step.checked_add(1),
            None => Some(1),
        }
    }

    /// Run one step labelled [`Simulation::next_step`].
    ///
    /// # Errors
    /// [`SimulationError::InvalidStepCount`] if no label follows the last step.
    pub fn step(&mut self) -> Result<StepRecord> {
        let step = self.next_step().ok_or(SimulationError::InvalidStepCount)?;
        self.step_at(step)
    }

    /// Run one step with an explicit label.
    pub fn step_at(&mut self, step: Step) -> Result<StepRecord> {
        let record = advance(
            &mut self.network,
            &mut self.book,
            &self.rule,
            &self.aggregator,
            &mut self.rng,
            step,
            Some(&self.hooks),
        )?;

        self.stats.steps += 1;
        self.stats.last_step = Some(step);
        self.stats.last_price = Some(record.price);
        self.stats.total_quotes += record.quotes as u64;

        if self.config.max_price_history > 0 {
            if self.price_history.len() == self.config.max_price_history {
                self.price_history.pop_front();
            }
            self.price_history.push_back(record.price);
        }

        if self.config.verbose {
            info!(step, price = record.price, "step");
        }
        self.hooks.on_step_end(&record, &self.stats);
        Ok(record)
    }

    /// Run every step in `steps`, returning one price per step.
    ///
    /// # Errors
    /// [`SimulationError::InvalidStepCount`] if `steps` is empty.
    pub fn run(&mut self, steps: impl IntoIterator<Item = Step>) -> Result<Vec<f64>> {
        let steps: Vec<Step> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(SimulationError::InvalidStepCount);
        }

        info!(
            steps = steps.len(),
            traders = self.network.len(),
            rule = self.rule.name(),
            aggregator = self.aggregator.name(),
            "simulation started"
        );
        let mut prices = Vec::with_capacity(steps.len());
        for step in steps {
            prices.push(self.step_at(step)?.price);
        }

        self.hooks.on_simulation_end(&self.stats);
        info!(
            steps = self.stats.steps,
            last_price = ?self.stats.last_price,
            "simulation finished"
        );
        Ok(prices)
    }

    /// Run `count` steps continuing from [`Simulation::next_step`].
    ///
    /// # Errors
    /// [`SimulationError::InvalidStepCount`] if `count` is zero or the labels
    /// would run past `Step::MAX`.
    pub fn run_for(&mut self, count: u64) -> Result<Vec<f64>> {
        let start = self.next_step().ok_or(SimulationError::InvalidStepCount)?;
        let last = count
            .checked_sub(1)
            .and_then(|n| start.checked_add(n))
            .ok_or(SimulationError::InvalidStepCount)?;
        self.run(start..=last)
    }

    /// Give back the network.
    pub fn into_network(self) -> TraderNetwork<L> {
        self.network
    }
}

impl<L, R, A> std::fmt::Debug for Simulation<L, R, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("traders", &self.network.len())
            .field("stats", &self.stats)
            .field("hooks", &self.hooks)
            .finish()
    }
}
