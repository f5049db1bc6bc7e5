//! Quote book and balancing-price search.
//!
//! Every step each trader submits one quote: a sell point `p_s` above which
//! it sells and a buy point `p_b` below which it buys. The book keeps both
//! sides sorted and finds the price where the market balances.
//!
//! # Clearing Price Algorithm
//!
//! At a candidate price `p`:
//! - sellers = number of sell points strictly below `p`
//! - buyers = number of buy points strictly above `p`
//! - imbalance = sellers - buyers
//!
//! Imbalance is non-decreasing in `p` and only changes at quote levels, so
//! it is enough to evaluate every level and every midpoint between adjacent
//! levels:
//!
//! 1. If the previous clearing price is already balanced, keep it
//! 2. Otherwise collect the runs of candidates with the smallest |imbalance|
//! 3. Pick the run nearest the previous price (lowest on ties)
//! 4. Return the midpoint of the price interval that run covers
//!
//! With distinct quote levels the smallest |imbalance| is always zero.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimCoreError};

/// One trader's price points for a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Sell when the market price is above this.
    pub sell: f64,
    /// Buy when the market price is below this.
    pub buy: f64,
}

impl Quote {
    pub fn new(sell: f64, buy: f64) -> Self {
        Self { sell, buy }
    }

    /// A quote whose buy point lies above its sell point.
    pub fn is_inverted(&self) -> bool {
        self.buy > self.sell
    }
}

/// Owned copy of the book, for observers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBookSnapshot {
    pub sell_prices: Vec<f64>,
    pub buy_prices: Vec<f64>,
    pub price: f64,
}

/// Sorted sell and buy price points for the current step.
///
/// The last clearing price survives [`QuoteBook::clear`] and serves as the
/// reference for the next search.
#[derive(Debug, Clone, Default)]
pub struct QuoteBook {
    sell_prices: Vec<f64>,
    buy_prices: Vec<f64>,
    price: f64,
}

impl QuoteBook {
    /// Create an empty book with reference price zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty book with the given reference price.
    pub fn with_reference_price(price: f64) -> Self {
        Self {
            price,
            ..Self::default()
        }
    }

    /// Insert one quote, keeping both sides sorted.
    pub fn insert(&mut self, quote: Quote) -> Result<()> {
        if !quote.sell.is_finite() || !quote.buy.is_finite() {
            return Err(SimCoreError::NonFiniteQuote {
                sell: quote.sell,
                buy: quote.buy,
            });
        }
        let at = self.sell_prices.partition_point(|&p| p <= quote.sell);
        self.sell_prices.insert(at, quote.sell);
        let at = self.buy_prices.partition_point(|&p| p <= quote.buy);
        self.buy_prices.insert(at, quote.buy);
        Ok(())
    }

    /// Drop all quotes. The current price is kept.
    pub fn clear(&mut self) {
        self.sell_prices.clear();
        self.buy_prices.clear();
    }

    /// Number of quotes in the book.
    pub fn len(&self) -> usize {
        self.sell_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sell_prices.is_empty()
    }

    /// Sorted sell points.
    pub fn sell_prices(&self) -> &[f64] {
        &self.sell_prices
    }

    /// Sorted buy points.
    pub fn buy_prices(&self) -> &[f64] {
        &self.buy_prices
    }

    /// Current market price (last clearing price, or the initial reference).
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Sellers minus buyers at `price`.
    pub fn imbalance_at(&self, price: f64) -> i64 {
        let sellers = self.sell_prices.partition_point(|&p| p < price);
        let buyers = self.buy_prices.len() - self.buy_prices.partition_point(|&p| p <= price);
        sellers as i64 - buyers as i64
    }

    /// Imbalance at the current price.
    pub fn imbalance(&self) -> i64 {
        self.imbalance_at(self.price)
    }

    /// Find the balancing price for the quotes in the book.
    ///
    /// The result becomes the book's current price.
    pub fn clearing_price(&mut self) -> Result<f64> {
        if self.is_empty() {
            return Err(SimCoreError::EmptyBook);
        }

        let reference = self.price;
        let candidates = self.candidate_prices();
        let scores: Vec<u64> = candidates
            .iter()
            .map(|&p| self.imbalance_at(p).unsigned_abs())
            .collect();
        let best = scores.iter().copied().min().unwrap_or(0);

        // Prefer the previous price for stability.
        if self.imbalance_at(reference).unsigned_abs() <= best {
            return Ok(reference);
        }

        // (distance to reference, midpoint) of the nearest best run
        let mut chosen: Option<(f64, f64)> = None;
        let mut i = 0;
        while i < candidates.len() {
            if scores[i] != best {
                i += 1;
                continue;
            }
            let start = i;
            while i + 1 < candidates.len() && scores[i + 1] == best {
                i += 1;
            }
            // Odd candidates are midpoints; widen them to the enclosing levels.
            let low = if start % 2 == 1 {
                candidates[start - 1]
            } else {
                candidates[start]
            };
            let high = if i % 2 == 1 {
                candidates[i + 1]
            } else {
                candidates[i]
            };
            let distance = if reference < low {
                low - reference
            } else if reference > high {
                reference - high
            } else {
                0.0
            };
            if chosen.is_none_or(|(d, _)| distance < d) {
                chosen = Some((distance, (low + high) / 2.0));
            }
            i += 1;
        }

        if let Some((_, price)) = chosen {
            self.price = price;
        }
        Ok(self.price)
    }

    /// Owned copy of the book.
    pub fn snapshot(&self) -> QuoteBookSnapshot {
        QuoteBookSnapshot {
            sell_prices: self.sell_prices.clone(),
            buy_prices: self.buy_prices.clone(),
            price: self.price,
        }
    }

    /// Every distinct quote level plus the midpoints between neighbours,
    /// in ascending order.
    fn candidate_prices(&self) -> Vec<f64> {
        let mut levels: Vec<f64> = self
            .sell_prices
            .iter()
            .chain(self.buy_prices.iter())
            .copied()
            .collect();
        levels.sort_by(f64::total_cmp);
        levels.dedup();

        let mut candidates = Vec::with_capacity(levels.len() * 2);
        for (i, &level) in levels.iter().enumerate() {
            if i > 0 {
                candidates.push((levels[i - 1] + level) / 2.0);
            }
            candidates.push(level);
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with(quotes: &[(f64, f64)]) -> QuoteBook {
        let mut book = QuoteBook::new();
        for &(sell, buy) in quotes {
            book.insert(Quote::new(sell, buy)).unwrap();
        }
        book
    }

    #[test]
    fn test_empty_book_fails() {
        let mut book = QuoteBook::new();
        assert_eq!(book.clearing_price(), Err(SimCoreError::EmptyBook));
    }

    #[test]
    fn test_single_quote_around_zero() {
        let mut book = book_with(&[(1.0, -1.0)]);
        assert_eq!(book.clearing_price().unwrap(), 0.0);
    }

    #[test]
    fn test_single_quote_translated() {
        let mut book = book_with(&[(4.0, 2.0)]);
        assert_eq!(book.clearing_price().unwrap(), 3.0);
        assert_eq!(book.price(), 3.0);
    }

    #[test]
    fn test_single_quote_inverted() {
        let mut book = book_with(&[(-4.0, -2.0)]);
        assert_eq!(book.clearing_price().unwrap(), -3.0);
        assert_eq!(book.imbalance(), 0);
    }

    #[test]
    fn test_clear_keeps_price() {
        let mut book = book_with(&[(4.0, 2.0)]);
        book.clearing_price().unwrap();
        book.clear();
        assert!(book.is_empty());
        assert_eq!(book.clearing_price(), Err(SimCoreError::EmptyBook));
        assert_eq!(book.price(), 3.0);

        book.insert(Quote::new(1.0, -1.0)).unwrap();
        // 3.0 is outside [-1, 1]: sellers 1, buyers 0
        assert_eq!(book.clearing_price().unwrap(), 0.0);
    }

    #[test]
    fn test_three_traders_with_one_inverted() {
        // a: sell 2, buy 6 (inverted); b: sell 3, buy 1; c: sell 5, buy 4
        let mut book = book_with(&[(2.0, 6.0), (3.0, 1.0), (5.0, 4.0)]);
        let price = book.clearing_price().unwrap();

        // Only (3, 4) balances two sellers against two buyers.
        assert_eq!(price, 3.5);
        assert_eq!(book.imbalance_at(price), 0);
        assert_eq!(book.imbalance_at(1.5), -2);
    }

    #[test]
    fn test_reference_price_kept_when_balanced() {
        let mut book = QuoteBook::with_reference_price(0.5);
        book.insert(Quote::new(1.0, -1.0)).unwrap();
        assert_eq!(book.clearing_price().unwrap(), 0.5);
    }

    #[test]
    fn test_balanced_region_midpoint() {
        // Only (1, 9) balances the two quotes.
        let mut book = QuoteBook::with_reference_price(12.0);
        for (sell, buy) in [(1.0, -1.0), (11.0, 9.0)] {
            book.insert(Quote::new(sell, buy)).unwrap();
        }
        assert_eq!(book.imbalance_at(12.0), 2);
        assert_eq!(book.clearing_price().unwrap(), 5.0);
    }

    #[test]
    fn test_no_exact_balance_uses_nearest_run() {
        // Two sell points coincide at 2, so imbalance jumps from -1 to +1.
        let quotes = [(2.0, 0.0), (2.0, -5.0), (10.0, 5.0)];

        let mut from_above = QuoteBook::with_reference_price(12.0);
        let mut from_below = QuoteBook::with_reference_price(-10.0);
        for (sell, buy) in quotes {
            from_above.insert(Quote::new(sell, buy)).unwrap();
            from_below.insert(Quote::new(sell, buy)).unwrap();
        }

        assert_eq!(from_above.clearing_price().unwrap(), 3.5);
        assert_eq!(from_above.imbalance(), 1);
        assert_eq!(from_below.clearing_price().unwrap(), 1.0);
        assert_eq!(from_below.imbalance(), -1);
    }

    #[test]
    fn test_balance_with_many_quotes() {
        let quotes: Vec<(f64, f64)> = (0..50)
            .map(|i| {
                let k = (i as f64 * 0.37).sin() * 3.0;
                (1.0 - k, -1.0 - k)
            })
            .collect();
        let mut book = book_with(&quotes);
        let price = book.clearing_price().unwrap();
        assert_eq!(book.len(), 50);
        assert_eq!(book.imbalance_at(price), 0);
    }

    #[test]
    fn test_sides_stay_sorted() {
        let book = book_with(&[(3.0, 1.0), (-2.0, -4.0), (7.0, 5.0)]);
        assert_eq!(book.sell_prices(), &[-2.0, 3.0, 7.0]);
        assert_eq!(book.buy_prices(), &[-4.0, 1.0, 5.0]);
    }

    #[test]
    fn test_non_finite_quote_rejected() {
        let mut book = QuoteBook::new();
        let err = book.insert(Quote::new(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, SimCoreError::NonFiniteQuote { .. }));
        assert!(book.is_empty());
    }

    #[test]
    fn test_inverted_quote_detection() {
        assert!(Quote::new(-4.0, -2.0).is_inverted());
        assert!(!Quote::new(1.0, -1.0).is_inverted());
    }
}
