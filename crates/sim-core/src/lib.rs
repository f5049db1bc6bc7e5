//! Sim-core: market mechanics for the trader network simulation.
//!
//! This crate provides:
//! - `QuoteBook`: sorted sell/buy price points submitted by traders each step
//! - The balancing-price search used to clear the market
//! - Error handling for clearing operations

mod error;
mod quote_book;

pub use error::{Result, SimCoreError};
pub use quote_book::{Quote, QuoteBook, QuoteBookSnapshot};
