use super::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Readiness plus the current ledger version and transaction count.
pub async fn ready(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.ledger.snapshot();
    Json(json!({
        "status": "ready",
        "ledgerVersion": snapshot.version(),
        "transactions": snapshot.len(),
    }))
}
