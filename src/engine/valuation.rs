use crate::domain::{Decimal, EnrichedPosition, Position, CONTRACT_MULTIPLIER};
use crate::pricing::{PriceSource, QuoteUnavailable};
use chrono::NaiveDate;
use std::sync::Arc;

/// Calendar days from `as_of` until expiration. Negative once expired.
pub fn days_to_expiration(expiration_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (expiration_date - as_of).num_days()
}

/// Mark-to-market P/L: `(current - avg) * net_quantity * 100`, unrounded.
///
/// The signed quantity makes shorts profit when the mark falls. `None` when
/// the result does not fit in a Decimal.
pub fn open_pl(avg_price: Decimal, current_price: Decimal, net_quantity: i64) -> Option<Decimal> {
    current_price
        .checked_sub(avg_price)?
        .checked_mul(Decimal::from(net_quantity))?
        .checked_mul(Decimal::from(CONTRACT_MULTIPLIER))
}

/// Outcome of valuing a batch: successes and per-position failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Valuation {
    pub positions: Vec<EnrichedPosition>,
    pub failures: Vec<QuoteUnavailable>,
}

/// Fills in days-to-expiration, current price and open P/L.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    source: Arc<dyn PriceSource>,
}

impl ValuationEngine {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Value a single position.
    ///
    /// Fails with [`QuoteUnavailable`] when the source has no usable quote.
    /// Negative quotes and quotes that overflow open P/L are unusable; no
    /// substitute price is ever used.
    pub fn valuate(
        &self,
        position: &Position,
        as_of: NaiveDate,
    ) -> Result<EnrichedPosition, QuoteUnavailable> {
        let current_price = self.source.quote(position)?;
        if current_price.is_negative() {
            return Err(QuoteUnavailable::new(
                position.key.clone(),
                format!("negative quote {}", current_price),
            ));
        }

        let pl = open_pl(position.avg_price, current_price, position.net_quantity)
            .ok_or_else(|| {
                QuoteUnavailable::new(
                    position.key.clone(),
                    format!("quote {} overflows open P/L", current_price),
                )
            })?;

        Ok(EnrichedPosition {
            key: position.key.clone(),
            net_quantity: position.net_quantity,
            avg_price: position.avg_price,
            transaction_count: position.transaction_count,
            days_to_expiration: days_to_expiration(position.key.expiration_date, as_of),
            current_price,
            open_pl: pl,
        })
    }

    /// Value every position independently; one failed quote never aborts the rest.
    pub fn valuate_all(&self, positions: &[Position], as_of: NaiveDate) -> Valuation {
        let mut valuation = Valuation::default();
        for position in positions {
            match self.valuate(position, as_of) {
                Ok(enriched) => valuation.positions.push(enriched),
                Err(err) => {
                    tracing::warn!(key = %err.key, reason = %err.reason, "quote unavailable");
                    valuation.failures.push(err);
                }
            }
        }
        valuation
    }
}
