//! Placeholder price sources that need no market data.

use super::{PriceSource, QuoteUnavailable};
use crate::domain::{Decimal, Position, PositionKey};
use rust_decimal::Decimal as RustDecimal;
use std::collections::HashMap;

/// Marks every position at a fixed multiple of its average price.
///
/// The default multiple is 1.10. This has no predictive value and only keeps
/// the P/L column populated until a real feed is wired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupPriceSource {
    markup: Decimal,
}

impl MarkupPriceSource {
    pub fn new(markup: Decimal) -> Self {
        Self { markup }
    }

    pub fn markup(&self) -> Decimal {
        self.markup
    }
}

impl Default for MarkupPriceSource {
    fn default() -> Self {
        Self::new(Decimal::new(RustDecimal::new(110, 2)))
    }
}

impl PriceSource for MarkupPriceSource {
    fn quote(&self, position: &Position) -> Result<Decimal, QuoteUnavailable> {
        position.avg_price.checked_mul(self.markup).ok_or_else(|| {
            QuoteUnavailable::new(position.key.clone(), "marked-up price out of range")
        })
    }
}

/// Returns preset quotes per contract; unknown contracts are unavailable.
#[derive(Debug, Clone, Default)]
pub struct FixedPriceSource {
    quotes: HashMap<PositionKey, Decimal>,
}

impl FixedPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quote returned for a contract.
    pub fn with_quote(mut self, key: PositionKey, price: Decimal) -> Self {
        self.quotes.insert(key, price);
        self
    }
}

impl PriceSource for FixedPriceSource {
    fn quote(&self, position: &Position) -> Result<Decimal, QuoteUnavailable> {
        self.quotes
            .get(&position.key)
            .copied()
            .ok_or_else(|| QuoteUnavailable::new(position.key.clone(), "no quote for contract"))
    }
}
