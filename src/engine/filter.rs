//! Selection helpers for presenting positions.
//!
//! An empty selection means "show all". Symbol and type selections combine with AND.

use crate::domain::{EnrichedPosition, OptionType, Position, PositionKey, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

impl AsRef<PositionKey> for Position {
    fn as_ref(&self) -> &PositionKey {
        &self.key
    }
}

impl AsRef<PositionKey> for EnrichedPosition {
    fn as_ref(&self) -> &PositionKey {
        &self.key
    }
}

/// Positions whose underlying is in `symbols`, in input order.
pub fn filter_by_symbol<T>(positions: &[T], symbols: &BTreeSet<Symbol>) -> Vec<T>
where
    T: AsRef<PositionKey> + Clone,
{
    positions
        .iter()
        .filter(|p| symbols.is_empty() || symbols.contains(&p.as_ref().underlying))
        .cloned()
        .collect()
}

/// Positions whose option type is in `types`, in input order.
pub fn filter_by_type<T>(positions: &[T], types: &BTreeSet<OptionType>) -> Vec<T>
where
    T: AsRef<PositionKey> + Clone,
{
    positions
        .iter()
        .filter(|p| types.is_empty() || types.contains(&p.as_ref().option_type))
        .cloned()
        .collect()
}

/// Distinct underlyings present, sorted.
pub fn available_symbols<T: AsRef<PositionKey>>(positions: &[T]) -> Vec<Symbol> {
    positions
        .iter()
        .map(|p| p.as_ref().underlying.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct option types present, sorted.
pub fn available_types<T: AsRef<PositionKey>>(positions: &[T]) -> Vec<OptionType> {
    positions
        .iter()
        .map(|p| p.as_ref().option_type)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Combined symbol and type selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFilter {
    pub symbols: BTreeSet<Symbol>,
    pub types: BTreeSet<OptionType>,
}

impl PositionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbols.insert(symbol);
        self
    }

    pub fn with_type(mut self, option_type: OptionType) -> Self {
        self.types.insert(option_type);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.types.is_empty()
    }

    pub fn apply<T>(&self, positions: &[T]) -> Vec<T>
    where
        T: AsRef<PositionKey> + Clone,
    {
        filter_by_type(&filter_by_symbol(positions, &self.symbols), &self.types)
    }
}
