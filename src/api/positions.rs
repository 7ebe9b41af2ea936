use crate::api::{today, AppState};
use crate::domain::{EnrichedPosition, OptionType, Symbol};
use crate::engine::{aggregate, available_symbols, available_types, build_report, PositionFilter};
use crate::error::AppError;
use crate::pricing::QuoteUnavailable;
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsQuery {
    /// Comma-separated underlyings; empty or absent selects all.
    pub symbols: Option<String>,
    /// Comma-separated option types; empty or absent selects all.
    pub types: Option<String>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub as_of: NaiveDate,
    pub ledger_version: u64,
    pub positions: Vec<PositionDto>,
    pub failures: Vec<QuoteFailureDto>,
    pub available_symbols: Vec<String>,
    pub available_types: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub underlying: String,
    pub option_type: String,
    pub strike: String,
    pub expiration_date: NaiveDate,
    pub net_quantity: i64,
    pub avg_price: String,
    pub days_to_expiration: i64,
    pub current_price: String,
    pub open_pl: String,
    pub expired: bool,
    pub transaction_count: usize,
}

impl From<&EnrichedPosition> for PositionDto {
    fn from(p: &EnrichedPosition) -> Self {
        PositionDto {
            underlying: p.underlying().to_string(),
            option_type: p.option_type().to_string(),
            strike: p.key.strike.to_canonical_string(),
            expiration_date: p.key.expiration_date,
            net_quantity: p.net_quantity,
            avg_price: p.avg_price.to_currency_string(),
            days_to_expiration: p.days_to_expiration,
            current_price: p.current_price.to_currency_string(),
            open_pl: p.open_pl.to_currency_string(),
            expired: p.is_expired(),
            transaction_count: p.transaction_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFailureDto {
    pub underlying: String,
    pub option_type: String,
    pub strike: String,
    pub expiration_date: NaiveDate,
    pub reason: String,
}

impl From<&QuoteUnavailable> for QuoteFailureDto {
    fn from(err: &QuoteUnavailable) -> Self {
        QuoteFailureDto {
            underlying: err.key.underlying.to_string(),
            option_type: err.key.option_type.to_string(),
            strike: err.key.strike.to_canonical_string(),
            expiration_date: err.key.expiration_date,
            reason: err.reason.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersResponse {
    pub available_symbols: Vec<String>,
    pub available_types: Vec<String>,
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_filter(params: &PositionsQuery) -> Result<PositionFilter, AppError> {
    let mut filter = PositionFilter::new();
    for raw in split_list(params.symbols.as_deref()) {
        if let Some(symbol) = Symbol::parse(raw) {
            filter = filter.with_symbol(symbol);
        }
    }
    for raw in split_list(params.types.as_deref()) {
        let option_type = raw
            .parse::<OptionType>()
            .map_err(|e| AppError::BadRequest(format!("Invalid types: {}", e)))?;
        filter = filter.with_type(option_type);
    }
    Ok(filter)
}

pub async fn get_positions(
    Query(params): Query<PositionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<PositionsResponse>, AppError> {
    let filter = parse_filter(&params)?;
    let as_of = params.as_of.unwrap_or_else(today);

    let snapshot = state.ledger.snapshot();
    let report = build_report(
        &snapshot,
        state.config.closed_positions,
        &state.valuation,
        as_of,
        &filter,
    );

    Ok(Json(PositionsResponse {
        as_of: report.as_of,
        ledger_version: report.ledger_version,
        positions: report.positions.iter().map(PositionDto::from).collect(),
        failures: report.failures.iter().map(QuoteFailureDto::from).collect(),
        available_symbols: report
            .available_symbols
            .iter()
            .map(|s| s.to_string())
            .collect(),
        available_types: report
            .available_types
            .iter()
            .map(|t| t.to_string())
            .collect(),
    }))
}

pub async fn get_filters(State(state): State<AppState>) -> Result<Json<FiltersResponse>, AppError> {
    let snapshot = state.ledger.snapshot();
    let positions = aggregate(&snapshot, state.config.closed_positions);

    Ok(Json(FiltersResponse {
        available_symbols: available_symbols(&positions)
            .iter()
            .map(|s| s.to_string())
            .collect(),
        available_types: available_types(&positions)
            .iter()
            .map(|t| t.to_string())
            .collect(),
    }))
}
