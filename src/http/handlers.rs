//! Request handlers for the public API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tokio::time::timeout;

use crate::bus::{Query as EventQuery, TX_TAG};
use crate::http::response::{data, ApiError, NOT_INCLUDED_CODE};
use crate::http::server::AppState;
use crate::node::RawTransaction;

#[derive(Debug, Deserialize)]
pub struct PushRequest {
    pub transaction: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub transaction: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinQuery {
    pub coin_to_sell: String,
    pub coin_to_buy: String,
    pub value: String,
}

/// Submit a transaction and wait until an ingested block contains it.
///
/// The subscription is opened before submitting so a fast block cannot slip
/// past unnoticed.
pub async fn push_transaction(
    State(state): State<AppState>,
    Json(request): Json<PushRequest>,
) -> Result<Response, ApiError> {
    let upper_hex = RawTransaction::new(request.transaction.as_str())
        .to_upper_hex()
        .map_err(|e| ApiError::bad_request(format!("transaction is not valid hex: {}", e)))?;

    let mut subscription = state
        .bus
        .subscribe(EventQuery::topic(state.topic.as_str()).with_tag(TX_TAG, upper_hex));

    let hash = state.gate.submit_transaction(&request.transaction).await?;

    match timeout(state.push_wait, subscription.recv()).await {
        Ok(Some(_)) => Ok(data(json!({ "hash": hash }))),
        Ok(None) | Err(_) => {
            tracing::warn!(hash = %hash, wait_secs = state.push_wait.as_secs(), "Transaction not seen in a block before timeout");
            let body = json!({
                "data": { "hash": hash },
                "error": {
                    "code": NOT_INCLUDED_CODE,
                    "message": "transaction was accepted but not included in a block in time",
                }
            });
            Ok((StatusCode::REQUEST_TIMEOUT, Json(body)).into_response())
        }
    }
}

pub async fn estimate_tx_commission(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Response, ApiError> {
    let commission = state.gate.estimate_commission(&query.transaction).await?;
    Ok(data(json!({ "commission": commission })))
}

pub async fn estimate_coin_buy(
    State(state): State<AppState>,
    Query(query): Query<CoinQuery>,
) -> Result<Response, ApiError> {
    let estimate = state
        .gate
        .estimate_coin_buy(&query.coin_to_sell, &query.coin_to_buy, &query.value)
        .await?;
    Ok(data(estimate))
}

pub async fn estimate_coin_sell(
    State(state): State<AppState>,
    Query(query): Query<CoinQuery>,
) -> Result<Response, ApiError> {
    let estimate = state
        .gate
        .estimate_coin_sell(&query.coin_to_sell, &query.coin_to_buy, &query.value)
        .await?;
    Ok(data(estimate))
}

pub async fn nonce(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Response, ApiError> {
    let nonce = state.gate.get_nonce(&address).await?;
    Ok(data(json!({ "nonce": nonce })))
}

pub async fn min_gas_price(State(state): State<AppState>) -> Result<Response, ApiError> {
    let gas = state.gate.get_min_gas_price().await?;
    Ok(data(json!({ "gas": gas })))
}

pub async fn health() -> &'static str {
    "ok"
}
