//! Domain types for the options position book.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Symbol, Action, OptionType
//! - Transaction records (raw input and validated ledger entry)
//! - PositionKey, Position and EnrichedPosition derived views

pub mod decimal;
pub mod position;
pub mod primitives;
pub mod transaction;

pub use decimal::Decimal;
pub use position::{EnrichedPosition, Position, PositionKey};
pub use primitives::{Action, OptionType, Symbol};
pub use transaction::{NewTransaction, Transaction, ValidationError, MAX_PRICE, MAX_QUANTITY};

/// Number of underlying shares represented by one option contract.
pub const CONTRACT_MULTIPLIER: i64 = 100;
