pub mod health;
pub mod positions;
pub mod transactions;

use crate::config::Config;
use crate::engine::ValuationEngine;
use crate::ledger::SharedLedger;
use crate::pricing::{MarkupPriceSource, PriceSource};
use axum::{routing::get, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub ledger: SharedLedger,
    pub valuation: ValuationEngine,
    pub config: Config,
}

impl AppState {
    /// State backed by a fresh ledger and the markup placeholder price source.
    pub fn new(config: Config) -> Self {
        let source: Arc<dyn PriceSource> =
            Arc::new(MarkupPriceSource::new(config.mock_price_markup));
        Self::with_price_source(config, source)
    }

    pub fn with_price_source(config: Config, source: Arc<dyn PriceSource>) -> Self {
        Self {
            ledger: SharedLedger::new(),
            valuation: ValuationEngine::new(source),
            config,
        }
    }
}

/// Current calendar date used when a request does not pin one.
pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/transactions",
            get(transactions::list_transactions)
                .post(transactions::create_transaction)
                .delete(transactions::clear_transactions),
        )
        .route(
            "/v1/transactions/export",
            get(transactions::export_transactions),
        )
        .route("/v1/transactions/:id", get(transactions::get_transaction))
        .route("/v1/positions", get(positions::get_positions))
        .route("/v1/positions/filters", get(positions::get_filters))
        .layer(cors)
        .with_state(state)
}
