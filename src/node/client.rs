//! Node API client with timeout and error handling.
//!
//! # Responsibilities
//! - Talk to the node's REST API
//! - Decode response envelopes into tagged outcomes
//! - Keep transport failures apart from node business errors

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use url::Url;

use crate::config::NodeConfig;
use crate::node::types::{
    AddressResult, Block, BlockResult, CommissionResult, Envelope, EstimateBuyResult,
    EstimateSellResult, MinGasPrice, NodeError, NodeResult, NodeStatus, PushResult,
    TransportError,
};
use crate::observability::metrics;

/// Everything the gateway needs from a node.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Current chain status.
    async fn status(&self) -> NodeResult<NodeStatus>;

    /// Block at `height`. Fails while the height is not produced yet.
    async fn block(&self, height: u64) -> NodeResult<Block>;

    /// Broadcast a signed transaction.
    async fn send_transaction(&self, tx: &str) -> NodeResult<PushResult>;

    async fn estimate_tx_commission(&self, tx: &str) -> NodeResult<CommissionResult>;

    async fn estimate_coin_buy(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value_to_buy: &str,
    ) -> NodeResult<EstimateBuyResult>;

    async fn estimate_coin_sell(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value_to_sell: &str,
    ) -> NodeResult<EstimateSellResult>;

    /// Account state; the gateway only reads the transaction count.
    async fn address(&self, address: &str) -> NodeResult<AddressResult>;

    async fn min_gas_price(&self) -> NodeResult<MinGasPrice>;
}

/// Shared handle used by the ingestion loop and the facade.
pub type SharedNodeClient = Arc<dyn NodeClient>;

/// HTTP client for the node REST API.
#[derive(Clone)]
pub struct HttpNodeClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_duration: Duration,
}

impl HttpNodeClient {
    /// Create a new client. Does not contact the node.
    pub fn new(config: &NodeConfig) -> Result<Self, TransportError> {
        let mut base_url: Url = config.api_url.parse().map_err(|e| {
            TransportError::Request(format!("invalid node URL '{}': {}", config.api_url, e))
        })?;

        // Relative joins must append to the path, not replace its last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        tracing::info!(api_url = %base_url, timeout_secs = config.timeout_secs, "Node client initialized");

        Ok(Self {
            http,
            base_url,
            timeout_duration: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> NodeResult<Envelope<T>> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let request = async {
            let response = self
                .http
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            // Error envelopes come with non-2xx statuses; the body decides.
            serde_json::from_slice::<Envelope<T>>(&body)
                .map_err(|e| TransportError::Malformed(format!("HTTP {}: {}", status, e)))
        };

        let outcome = match timeout(self.timeout_duration, request).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout_duration.as_secs())),
        };

        if let Err(e) = &outcome {
            tracing::debug!(operation, error = %e, "Node transport failure");
        }
        Ok(outcome?)
    }

    /// GET an endpoint whose envelope alone decides the outcome.
    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> NodeResult<T> {
        let result = match self.get(operation, endpoint, query).await {
            Ok(envelope) => envelope.into_result(),
            Err(e) => Err(e),
        };
        observe(operation, result)
    }
}

/// Metric label of a classified outcome: `ok`, `transport` or `node`.
fn outcome_label<T>(result: &NodeResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

/// Count a node call by its final, classified outcome.
fn observe<T>(operation: &'static str, result: NodeResult<T>) -> NodeResult<T> {
    metrics::record_node_request(operation, outcome_label(&result));
    result
}

/// Raw transactions travel with a `0x` prefix.
fn prefixed(tx: &str) -> String {
    if tx.starts_with("0x") || tx.starts_with("0X") {
        tx.to_string()
    } else {
        format!("0x{}", tx)
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn status(&self) -> NodeResult<NodeStatus> {
        self.fetch("status", "status", &[]).await
    }

    async fn block(&self, height: u64) -> NodeResult<Block> {
        let height_param = height.to_string();
        let result: BlockResult = self
            .fetch("block", "block", &[("height", height_param.as_str())])
            .await?;
        Ok(Block::from_result(height, result))
    }

    async fn send_transaction(&self, tx: &str) -> NodeResult<PushResult> {
        let tx = prefixed(tx);
        let result: NodeResult<PushResult> = match self
            .get("send_transaction", "send_transaction", &[("tx", tx.as_str())])
            .await
        {
            Ok(envelope) => {
                let code = envelope.result.as_ref().map(|r: &PushResult| r.code).unwrap_or(0);
                match NodeError::classify(envelope.error.clone(), code) {
                    Some(err) => Err(err.into()),
                    None => envelope.into_result(),
                }
            }
            Err(e) => Err(e),
        };
        observe("send_transaction", result)
    }

    async fn estimate_tx_commission(&self, tx: &str) -> NodeResult<CommissionResult> {
        let tx = prefixed(tx);
        self.fetch("estimate_tx_commission", "estimate_tx_commission", &[("tx", tx.as_str())])
            .await
    }

    async fn estimate_coin_buy(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value_to_buy: &str,
    ) -> NodeResult<EstimateBuyResult> {
        self.fetch(
            "estimate_coin_buy",
            "estimate_coin_buy",
            &[
                ("coin_to_sell", coin_to_sell),
                ("coin_to_buy", coin_to_buy),
                ("value_to_buy", value_to_buy),
            ],
        )
        .await
    }

    async fn estimate_coin_sell(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value_to_sell: &str,
    ) -> NodeResult<EstimateSellResult> {
        self.fetch(
            "estimate_coin_sell",
            "estimate_coin_sell",
            &[
                ("coin_to_sell", coin_to_sell),
                ("coin_to_buy", coin_to_buy),
                ("value_to_sell", value_to_sell),
            ],
        )
        .await
    }

    async fn address(&self, address: &str) -> NodeResult<AddressResult> {
        self.fetch("address", "address", &[("address", address)]).await
    }

    async fn min_gas_price(&self) -> NodeResult<MinGasPrice> {
        self.fetch("min_gas_price", "min_gas_price", &[]).await
    }
}

impl std::fmt::Debug for HttpNodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNodeClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
