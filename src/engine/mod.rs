//! Pure computation over ledger snapshots: aggregation, valuation, filtering.

use crate::domain::{EnrichedPosition, OptionType, PositionKey, Symbol};
use crate::ledger::LedgerSnapshot;
use crate::pricing::QuoteUnavailable;
use chrono::NaiveDate;

pub mod aggregator;
pub mod filter;
pub mod valuation;

pub use aggregator::{aggregate, ClosedPositionPolicy, PositionAggregator};
pub use filter::{
    available_symbols, available_types, filter_by_symbol, filter_by_type, PositionFilter,
};
pub use valuation::{days_to_expiration, open_pl, Valuation, ValuationEngine};

impl AsRef<PositionKey> for QuoteUnavailable {
    fn as_ref(&self) -> &PositionKey {
        &self.key
    }
}

/// Everything the positions table needs, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionReport {
    /// Ledger version the report was computed from.
    pub ledger_version: u64,
    pub as_of: NaiveDate,
    pub positions: Vec<EnrichedPosition>,
    /// Rows that could not be priced, after the same filter as `positions`.
    pub failures: Vec<QuoteUnavailable>,
    /// Filter choices over all aggregated positions, ignoring the current filter.
    pub available_symbols: Vec<Symbol>,
    pub available_types: Vec<OptionType>,
}

/// Run the full pipeline: aggregate, value, then filter.
pub fn build_report(
    snapshot: &LedgerSnapshot,
    policy: ClosedPositionPolicy,
    engine: &ValuationEngine,
    as_of: NaiveDate,
    filter: &PositionFilter,
) -> PositionReport {
    let positions = aggregate(snapshot, policy);
    let symbols = available_symbols(&positions);
    let types = available_types(&positions);
    let valuation = engine.valuate_all(&positions, as_of);

    PositionReport {
        ledger_version: snapshot.version(),
        as_of,
        positions: filter.apply(&valuation.positions),
        failures: filter.apply(&valuation.failures),
        available_symbols: symbols,
        available_types: types,
    }
}
