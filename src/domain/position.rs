//! Derived position views.

use crate::domain::{Decimal, OptionType, Symbol};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of an option contract: every transaction sharing this tuple
/// belongs to the same position.
///
/// Field order defines the sort order of aggregated positions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionKey {
    pub underlying: Symbol,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub expiration_date: NaiveDate,
}

impl std::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.underlying, self.expiration_date, self.strike, self.option_type
        )
    }
}

/// Net holding in one contract, aggregated from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub key: PositionKey,
    /// Signed sum of constituent quantities: positive = long, negative = short, zero = closed.
    pub net_quantity: i64,
    /// Average of every constituent price weighted by absolute quantity,
    /// closing trades included.
    pub avg_price: Decimal,
    /// Number of ledger entries that contributed to this position.
    pub transaction_count: usize,
}

impl Position {
    pub fn is_closed(&self) -> bool {
        self.net_quantity == 0
    }
}

/// A position with its time-based and mark-to-market fields filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPosition {
    pub key: PositionKey,
    pub net_quantity: i64,
    pub avg_price: Decimal,
    pub transaction_count: usize,
    /// Negative once the contract has expired.
    pub days_to_expiration: i64,
    pub current_price: Decimal,
    pub open_pl: Decimal,
}

impl EnrichedPosition {
    pub fn underlying(&self) -> &Symbol {
        &self.key.underlying
    }

    pub fn option_type(&self) -> OptionType {
        self.key.option_type
    }

    pub fn is_expired(&self) -> bool {
        self.days_to_expiration < 0
    }
}
