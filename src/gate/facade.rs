//! Gateway facade.

use crate::gate::errors::{GateError, GateResult};
use crate::gate::types::{CoinEstimate, TransactionHash};
use crate::node::{NodeError, SharedNodeClient};

/// Stateless front for client operations. Cheap to clone.
#[derive(Clone)]
pub struct Gate {
    node: SharedNodeClient,
}

impl Gate {
    pub fn new(node: SharedNodeClient) -> Self {
        Self { node }
    }

    /// Broadcast a signed transaction and return its hash.
    ///
    /// Succeeds only when the node reports no error and a zero result code.
    pub async fn submit_transaction(&self, transaction: &str) -> GateResult<TransactionHash> {
        let result = self.node.send_transaction(transaction).await.map_err(|e| {
            let err = GateError::from(e);
            tracing::error!(operation = "submit_transaction", transaction, kind = err.kind(), error = %err, "Node request failed");
            err
        })?;

        // HttpNodeClient already rejects non-zero codes; other clients may not.
        if let Some(node_err) = NodeError::classify(None, result.code) {
            let err = GateError::Node(node_err);
            tracing::error!(operation = "submit_transaction", transaction, kind = err.kind(), error = %err, "Node request failed");
            return Err(err);
        }

        Ok(TransactionHash::from_node_hash(&result.hash))
    }

    /// Fee the node would charge for `transaction`.
    pub async fn estimate_commission(&self, transaction: &str) -> GateResult<String> {
        self.node
            .estimate_tx_commission(transaction)
            .await
            .map(|result| result.commission)
            .map_err(|e| {
                let err = GateError::from(e);
                tracing::error!(operation = "estimate_commission", transaction, kind = err.kind(), error = %err, "Node request failed");
                err
            })
    }

    /// How much `coin_to_sell` buying `value` of `coin_to_buy` costs.
    pub async fn estimate_coin_buy(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GateResult<CoinEstimate> {
        self.node
            .estimate_coin_buy(coin_to_sell, coin_to_buy, value)
            .await
            .map(|result| CoinEstimate {
                value: result.will_pay,
                commission: result.commission,
            })
            .map_err(|e| {
                let err = GateError::from(e);
                tracing::error!(operation = "estimate_coin_buy", coin_to_sell, coin_to_buy, value, kind = err.kind(), error = %err, "Node request failed");
                err
            })
    }

    /// How much `coin_to_buy` selling `value` of `coin_to_sell` yields.
    pub async fn estimate_coin_sell(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GateResult<CoinEstimate> {
        self.node
            .estimate_coin_sell(coin_to_sell, coin_to_buy, value)
            .await
            .map(|result| CoinEstimate {
                value: result.will_get,
                commission: result.commission,
            })
            .map_err(|e| {
                let err = GateError::from(e);
                tracing::error!(operation = "estimate_coin_sell", coin_to_sell, coin_to_buy, value, kind = err.kind(), error = %err, "Node request failed");
                err
            })
    }

    /// Transaction count of `address`, which is its next nonce base.
    pub async fn get_nonce(&self, address: &str) -> GateResult<String> {
        self.node
            .address(address)
            .await
            .map(|result| result.transaction_count)
            .map_err(|e| {
                let err = GateError::from(e);
                tracing::error!(operation = "get_nonce", address, kind = err.kind(), error = %err, "Node request failed");
                err
            })
    }

    pub async fn get_min_gas_price(&self) -> GateResult<String> {
        self.node
            .min_gas_price()
            .await
            .map(|price| price.0)
            .map_err(|e| {
                let err = GateError::from(e);
                tracing::error!(operation = "get_min_gas_price", kind = err.kind(), error = %err, "Node request failed");
                err
            })
    }
}
