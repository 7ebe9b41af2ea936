pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod pricing;

pub use config::Config;
pub use domain::{
    Action, Decimal, EnrichedPosition, NewTransaction, OptionType, Position, PositionKey, Symbol,
    Transaction, ValidationError,
};
pub use engine::{ClosedPositionPolicy, PositionFilter, PositionReport, ValuationEngine};
pub use error::AppError;
pub use ledger::{Ledger, LedgerSnapshot, SharedLedger};
pub use pricing::{FixedPriceSource, MarkupPriceSource, PriceSource, QuoteUnavailable};
