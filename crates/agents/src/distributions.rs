//! Parameter sources for trader construction.
//!
//! Every trader parameter (A, B, C, D, initial signal, epsilon) is drawn
//! from a [`ParamSource`] when the trader is built. Epsilon keeps its source
//! and is redrawn every step.
//!
//! # Sources
//!
//! - **Constant**: the same value for every trader
//! - **Normal** / **Uniform**: independent draws per trader
//! - **Choice**: uniform pick from a fixed set (e.g. buy/hold/sell)
//! - **PerTrader**: value `i` goes to the `i`-th node in index order
//!
//! Sources are plain data, so trader configs round-trip through JSON.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

// =============================================================================
// ParamSource
// =============================================================================

/// Where a trader parameter comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSource {
    Constant(f64),
    Normal { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
    Choice(Vec<f64>),
    PerTrader(Vec<f64>),
}

impl Default for ParamSource {
    fn default() -> Self {
        ParamSource::Constant(0.0)
    }
}

impl From<f64> for ParamSource {
    fn from(value: f64) -> Self {
        ParamSource::Constant(value)
    }
}

impl ParamSource {
    /// Normal distribution source.
    pub fn normal(mean: f64, std_dev: f64) -> Self {
        ParamSource::Normal { mean, std_dev }
    }

    /// Uniform distribution source over `[low, high]`.
    pub fn uniform(low: f64, high: f64) -> Self {
        ParamSource::Uniform { low, high }
    }

    /// Uniform pick among buy (-1), hold (0) and sell (+1).
    pub fn buy_hold_sell() -> Self {
        ParamSource::Choice(vec![-1.0, 0.0, 1.0])
    }

    /// True if sampling never consumes randomness.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, ParamSource::Constant(_) | ParamSource::PerTrader(_))
    }

    /// Check the source can serve `traders` traders.
    pub fn validate(&self, name: &'static str, traders: usize) -> Result<()> {
        let invalid = |reason: String| AgentError::InvalidParameter { name, reason };
        match self {
            ParamSource::Constant(v) if !v.is_finite() => {
                Err(invalid(format!("constant {v} is not finite")))
            }
            ParamSource::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || *std_dev < 0.0 {
                    Err(invalid(format!(
                        "normal(mean {mean}, std_dev {std_dev}) needs finite values and std_dev >= 0"
                    )))
                } else {
                    Ok(())
                }
            }
            ParamSource::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low > high {
                    Err(invalid(format!(
                        "uniform[{low}, {high}] needs finite bounds with low <= high"
                    )))
                } else {
                    Ok(())
                }
            }
            ParamSource::Choice(values) if values.is_empty() => {
                Err(invalid("choice from an empty set".into()))
            }
            ParamSource::PerTrader(values) if values.len() < traders => {
                Err(AgentError::MissingPerTraderValue {
                    name,
                    index: values.len(),
                    len: values.len(),
                })
            }
            ParamSource::Choice(values) | ParamSource::PerTrader(values) => {
                match values.iter().position(|v| !v.is_finite()) {
                    Some(i) => Err(invalid(format!(
                        "value {} at position {i} is not finite",
                        values[i]
                    ))),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    /// The source a single trader keeps for later redraws.
    ///
    /// Per-trader lists collapse to the trader's own constant.
    pub fn for_trader(&self, name: &'static str, index: usize) -> Result<ParamSource> {
        match self {
            ParamSource::PerTrader(values) => values
                .get(index)
                .map(|&v| ParamSource::Constant(v))
                .ok_or(AgentError::MissingPerTraderValue {
                    name,
                    index,
                    len: values.len(),
                }),
            other => Ok(other.clone()),
        }
    }

    /// Draw a value for the trader at node position `index`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        name: &'static str,
        index: usize,
        rng: &mut R,
    ) -> Result<f64> {
        let invalid = |reason: String| AgentError::InvalidParameter { name, reason };
        match self {
            ParamSource::Constant(v) => Ok(*v),
            ParamSource::Normal { mean, std_dev } => Normal::new(*mean, *std_dev)
                .map(|dist| dist.sample(rng))
                .map_err(|e| invalid(e.to_string())),
            ParamSource::Uniform { low, high } => Uniform::new_inclusive(*low, *high)
                .map(|dist| dist.sample(rng))
                .map_err(|e| invalid(e.to_string())),
            ParamSource::Choice(values) => {
                if values.is_empty() {
                    return Err(invalid("choice from an empty set".into()));
                }
                Ok(values[rng.random_range(0..values.len())])
            }
            ParamSource::PerTrader(values) => {
                values
                    .get(index)
                    .copied()
                    .ok_or(AgentError::MissingPerTraderValue {
                        name,
                        index,
                        len: values.len(),
                    })
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
