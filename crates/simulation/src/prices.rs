//! Free-standing price simulation over a borrowed network.
//!
//! These mirror the [`crate::Simulation`] runner without owning anything:
//! the caller keeps the network, chooses the RNG, and gets prices back by
//! value. Validation happens before the first step, so a call rejected by
//! validation leaves the network untouched. An error raised during a later
//! step stops the run there; steps already committed (and the perception
//! errors drawn for the failing step) stay applied.

use agents::UpdateRule;
use network::TraderNetwork;
use rand::RngCore;
use sim_core::QuoteBook;
use types::Step;

use crate::aggregate::PriceAggregator;
use crate::error::{Result, SimulationError};
use crate::runner::{advance, validate};

/// Run the network through `steps` and return one price per step.
///
/// Step labels are passed to the rule as the step's time value; their count
/// sets the run length.
///
/// # Errors
/// - [`SimulationError::InvalidStepCount`] if `steps` is empty
/// - [`SimulationError::EmptyNetwork`] if the network has no traders
/// - [`SimulationError::InvalidRule`] if the rule rejects a trader
pub fn simulate_prices<L, R, A>(
    network: &mut TraderNetwork<L>,
    steps: impl IntoIterator<Item = Step>,
    rule: &R,
    aggregator: &A,
    rng: &mut dyn RngCore,
) -> Result<Vec<f64>>
where
    R: UpdateRule + ?Sized,
    A: PriceAggregator + ?Sized,
{
    let steps: Vec<Step> = steps.into_iter().collect();
    if steps.is_empty() {
        return Err(SimulationError::InvalidStepCount);
    }

    let mut book = QuoteBook::new();
    evolve(network, &mut book, steps, rule, aggregator, rng)
        .map(|result| result.map(|(_, price)| price))
        .collect()
}

/// Lazily evolve the network, yielding `(step, price)` per step.
///
/// `book` carries the clearing price between steps; its current price is the
/// reference for the first clearing. An empty `steps` yields nothing. After
/// the first error the iterator is exhausted.
pub fn evolve<'a, L, R, A, I>(
    network: &'a mut TraderNetwork<L>,
    book: &'a mut QuoteBook,
    steps: I,
    rule: &'a R,
    aggregator: &'a A,
    rng: &'a mut dyn RngCore,
) -> Evolve<'a, L, R, A, I::IntoIter>
where
    R: UpdateRule + ?Sized,
    A: PriceAggregator + ?Sized,
    I: IntoIterator<Item = Step>,
{
    Evolve {
        network,
        book,
        rule,
        aggregator,
        rng,
        steps: steps.into_iter(),
        validated: false,
        done: false,
    }
}

/// Iterator returned by [`evolve`].
pub struct Evolve<'a, L, R: ?Sized, A: ?Sized, I> {
    network: &'a mut TraderNetwork<L>,
    book: &'a mut QuoteBook,
    rule: &'a R,
    aggregator: &'a A,
    rng: &'a mut dyn RngCore,
    steps: I,
    validated: bool,
    done: bool,
}

impl<L, R, A, I> Iterator for Evolve<'_, L, R, A, I>
where
    R: UpdateRule + ?Sized,
    A: PriceAggregator + ?Sized,
    I: Iterator<Item = Step>,
{
    type Item = Result<(Step, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let step = self.steps.next()?;

        if !self.validated {
            if let Err(err) = validate(&*self.network, self.rule, self.aggregator) {
                self.done = true;
                return Some(Err(err));
            }
            self.validated = true;
        }

        match advance(
            &mut *self.network,
            &mut *self.book,
            self.rule,
            self.aggregator,
            &mut *self.rng,
            step,
            None,
        ) {
            Ok(record) => Some(Ok((step, record.price))),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Per-step output of [`simulate_and_distill`].
#[derive(Debug, Clone, PartialEq)]
pub struct Distilled<T, U> {
    pub step: Step,
    pub price: f64,
    /// Result of the network distiller, if one was given.
    pub network: Option<T>,
    /// Result of the book distiller, if one was given.
    pub book: Option<U>,
}

/// Evolve the network and collect caller-chosen data after every step.
///
/// `network_distiller` sees the network after the step's commit;
/// `book_distiller` sees the quote book as the step left it.
///
/// # Errors
/// Same as [`simulate_prices`].
#[allow(clippy::too_many_arguments)]
pub fn simulate_and_distill<L, R, A, T, U, F, G>(
    network: &mut TraderNetwork<L>,
    book: &mut QuoteBook,
    steps: impl IntoIterator<Item = Step>,
    rule: &R,
    aggregator: &A,
    rng: &mut dyn RngCore,
    mut network_distiller: Option<F>,
    mut book_distiller: Option<G>,
) -> Result<Vec<Distilled<T, U>>>
where
    R: UpdateRule + ?Sized,
    A: PriceAggregator + ?Sized,
    F: FnMut(Step, &TraderNetwork<L>) -> T,
    G: FnMut(Step, &QuoteBook) -> U,
{
    let steps: Vec<Step> = steps.into_iter().collect();
    if steps.is_empty() {
        return Err(SimulationError::InvalidStepCount);
    }
    validate(network, rule, aggregator)?;

    let mut data = Vec::with_capacity(steps.len());
    for step in steps {
        let record = advance(network, book, rule, aggregator, rng, step, None)?;
        data.push(Distilled {
            step,
            price: record.price,
            network: network_distiller.as_mut().map(|f| f(step, &*network)),
            book: book_distiller.as_mut().map(|f| f(step, &*book)),
        });
    }
    Ok(data)
}
