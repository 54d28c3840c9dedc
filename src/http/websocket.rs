//! WebSocket relay of bus events.
//!
//! ```text
//! InMemoryEventBus ── Subscription(NewTx[, tx=HEX]) ──▶ JSON text frames ──▶ client
//! ```
//!
//! The subscription is registered before the upgrade completes. Client
//! frames other than Close are ignored.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::bus::{Query as EventQuery, Subscription, TX_TAG};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::node::RawTransaction;

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeQuery {
    /// Only relay the transaction with this hex encoding.
    pub tx: Option<String>,
}

pub async fn subscribe(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<SubscribeQuery>,
) -> Result<Response, ApiError> {
    let mut query = EventQuery::topic(state.topic.as_str());
    if let Some(tx) = params.tx.filter(|tx| !tx.is_empty()) {
        // Same canonical form the ingestion loop tags events with.
        let upper_hex = RawTransaction::new(tx)
            .to_upper_hex()
            .map_err(|e| ApiError::bad_request(format!("tx is not valid hex: {}", e)))?;
        query = query.with_tag(TX_TAG, upper_hex);
    }

    let subscription = state.bus.subscribe(query);
    Ok(ws.on_upgrade(move |socket| relay(socket, subscription)))
}

async fn relay(socket: WebSocket, mut subscription: Subscription) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode event");
                        continue;
                    }
                };
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(topic = %subscription.query().topic, "WebSocket subscriber disconnected");
}
