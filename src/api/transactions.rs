use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{today, AppState};
use crate::domain::{Action, Decimal, NewTransaction, OptionType, Transaction};
use crate::error::AppError;

/// Body of `POST /v1/transactions`: the "New Transaction" form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub date: Option<NaiveDate>,
    pub action: Action,
    pub option_type: OptionType,
    pub underlying: String,
    pub quantity: i64,
    pub expiration_date: NaiveDate,
    pub strike: Decimal,
    pub price: Decimal,
    pub commission: Option<Decimal>,
}

impl CreateTransactionRequest {
    /// Apply form defaults and checks that belong to the input boundary.
    fn into_new_transaction(self, default_date: NaiveDate) -> Result<NewTransaction, AppError> {
        let date = self.date.unwrap_or(default_date);
        if self.expiration_date < date {
            return Err(AppError::invalid_field(
                "expirationDate",
                format!(
                    "expiration {} is before trade date {}",
                    self.expiration_date, date
                ),
            ));
        }

        Ok(NewTransaction {
            date,
            action: self.action,
            option_type: self.option_type,
            underlying: self.underlying,
            quantity: self.quantity,
            expiration_date: self.expiration_date,
            strike: self.strike,
            price: self.price,
            commission: self.commission.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub date: NaiveDate,
    pub action: String,
    pub option_type: String,
    pub underlying: String,
    pub quantity: i64,
    pub expiration_date: NaiveDate,
    pub strike: String,
    pub price: String,
    pub commission: String,
}

impl From<&Transaction> for TransactionDto {
    fn from(tx: &Transaction) -> Self {
        TransactionDto {
            id: tx.id.to_string(),
            date: tx.date,
            action: tx.action.to_string(),
            option_type: tx.option_type.to_string(),
            underlying: tx.underlying.to_string(),
            quantity: tx.quantity,
            expiration_date: tx.expiration_date,
            strike: tx.strike.to_canonical_string(),
            price: tx.price.to_canonical_string(),
            commission: tx.commission.to_canonical_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub ledger_version: u64,
    pub transactions: Vec<TransactionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub ledger_version: u64,
    pub cleared: usize,
}

/// CSV row layout for the transactions export.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Action")]
    action: String,
    #[serde(rename = "Type")]
    option_type: String,
    #[serde(rename = "Underlying")]
    underlying: &'a str,
    #[serde(rename = "Qty")]
    quantity: i64,
    #[serde(rename = "ExpDate")]
    expiration_date: NaiveDate,
    #[serde(rename = "Strike")]
    strike: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Commission")]
    commission: String,
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionDto>), AppError> {
    let record = body.into_new_transaction(today())?;
    let tx = state.ledger.append(record)?;
    Ok((StatusCode::CREATED, Json(TransactionDto::from(&tx))))
}

pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let snapshot = state.ledger.snapshot();
    Ok(Json(TransactionsResponse {
        ledger_version: snapshot.version(),
        transactions: snapshot.iter().map(TransactionDto::from).collect(),
    }))
}

pub async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TransactionDto>, AppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid transaction id".to_string()))?;
    let snapshot = state.ledger.snapshot();
    snapshot
        .iter()
        .find(|tx| tx.id == id)
        .map(|tx| Json(TransactionDto::from(tx)))
        .ok_or_else(|| AppError::NotFound(format!("transaction {}", id)))
}

pub async fn clear_transactions(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, AppError> {
    let cleared = state.ledger.clear();
    Ok(Json(ClearResponse {
        ledger_version: state.ledger.snapshot().version(),
        cleared,
    }))
}

pub async fn export_transactions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.ledger.snapshot();
    let body = render_csv(&snapshot)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        body,
    ))
}

fn render_csv(transactions: &[Transaction]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for tx in transactions {
        writer
            .serialize(ExportRow {
                date: tx.date,
                action: tx.action.to_string(),
                option_type: tx.option_type.to_string(),
                underlying: tx.underlying.as_str(),
                quantity: tx.quantity,
                expiration_date: tx.expiration_date,
                strike: tx.strike.to_canonical_string(),
                price: tx.price.to_canonical_string(),
                commission: tx.commission.to_canonical_string(),
            })
            .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}
