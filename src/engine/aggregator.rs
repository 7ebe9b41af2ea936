use crate::domain::{Decimal, Position, PositionKey, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// What to do with positions whose net quantity nets out to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosedPositionPolicy {
    /// Keep closed positions in the output; their open P/L is zero.
    #[default]
    Retain,
    /// Leave closed positions out of the output.
    Drop,
}

impl FromStr for ClosedPositionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retain" => Ok(ClosedPositionPolicy::Retain),
            "drop" => Ok(ClosedPositionPolicy::Drop),
            other => Err(format!("must be retain or drop, got {}", other)),
        }
    }
}

/// Running totals for one position key.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    net_quantity: i64,
    weighted_price_sum: Decimal,
    total_weight: i64,
    transaction_count: usize,
}

/// Groups ledger transactions into positions.
///
/// The average price blends every transaction against the key, closing trades
/// included, weighted by absolute quantity. This is a simple blended average,
/// not FIFO/LIFO cost basis.
#[derive(Debug, Default)]
pub struct PositionAggregator {
    groups: BTreeMap<PositionKey, Accumulator>,
}

impl PositionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one transaction into its position.
    ///
    /// Validated transactions are bounded by `MAX_QUANTITY` and `MAX_PRICE`,
    /// so the running totals stay far inside `i64` and `Decimal` range.
    pub fn process_transaction(&mut self, tx: &Transaction) {
        let weight = tx.abs_quantity();
        let acc = self.groups.entry(tx.key()).or_default();
        acc.net_quantity += tx.quantity;
        acc.weighted_price_sum = acc.weighted_price_sum + tx.price * Decimal::from(weight);
        acc.total_weight += weight;
        acc.transaction_count += 1;
    }

    /// Emit positions sorted by key.
    pub fn into_positions(self, policy: ClosedPositionPolicy) -> Vec<Position> {
        self.groups
            .into_iter()
            .filter(|(_, acc)| policy == ClosedPositionPolicy::Retain || acc.net_quantity != 0)
            .filter_map(|(key, acc)| {
                // Every stored transaction has non-zero quantity, so a
                // non-empty group always has positive weight.
                if acc.total_weight == 0 {
                    return None;
                }
                Some(Position {
                    key,
                    net_quantity: acc.net_quantity,
                    avg_price: acc.weighted_price_sum / Decimal::from(acc.total_weight),
                    transaction_count: acc.transaction_count,
                })
            })
            .collect()
    }
}

/// Aggregate a ledger snapshot into positions, sorted by key.
pub fn aggregate(transactions: &[Transaction], policy: ClosedPositionPolicy) -> Vec<Position> {
    let mut aggregator = PositionAggregator::new();
    for tx in transactions {
        aggregator.process_transaction(tx);
    }
    let positions = aggregator.into_positions(policy);
    tracing::debug!(
        transactions = transactions.len(),
        positions = positions.len(),
        ?policy,
        "aggregated ledger"
    );
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "retain".parse::<ClosedPositionPolicy>().unwrap(),
            ClosedPositionPolicy::Retain
        );
        assert_eq!(
            "drop".parse::<ClosedPositionPolicy>().unwrap(),
            ClosedPositionPolicy::Drop
        );
        assert!("keep".parse::<ClosedPositionPolicy>().is_err());
        assert_eq!(ClosedPositionPolicy::default(), ClosedPositionPolicy::Retain);
    }

    #[test]
    fn test_empty_ledger_yields_no_positions() {
        assert!(aggregate(&[], ClosedPositionPolicy::Retain).is_empty());
        assert!(PositionAggregator::new()
            .into_positions(ClosedPositionPolicy::Drop)
            .is_empty());
    }
}
