//! Price source abstraction for marking positions to market.

use crate::domain::{Decimal, Position, PositionKey};
use std::fmt;
use thiserror::Error;

pub mod mock;

pub use mock::{FixedPriceSource, MarkupPriceSource};

/// Supplies a current per-contract mark for a position.
///
/// Implementations backed by a network feed own their timeout and retry
/// policy; the valuation engine only sees success or [`QuoteUnavailable`].
/// Quotes must be non-negative.
pub trait PriceSource: Send + Sync + fmt::Debug {
    /// Quote the contract identified by `position.key`.
    ///
    /// The whole position is passed so placeholder sources can price from
    /// cost basis; a market-data feed should depend on the key alone.
    fn quote(&self, position: &Position) -> Result<Decimal, QuoteUnavailable>;
}

/// The price source could not produce a mark for a contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quote unavailable for {key}: {reason}")]
pub struct QuoteUnavailable {
    pub key: PositionKey,
    pub reason: String,
}

impl QuoteUnavailable {
    pub fn new(key: PositionKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}
