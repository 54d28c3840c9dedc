//! Scripted node used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::node::client::NodeClient;
use crate::node::types::{
    AddressResult, Block, CommissionResult, EstimateBuyResult, EstimateSellResult, MinGasPrice,
    NodeError, NodeResult, NodeStatus, PushResult, RawTransaction, TransportError,
};

fn unscripted<T>() -> NodeResult<T> {
    Err(TransportError::Request("not scripted".into()).into())
}

pub(crate) fn transport_error(msg: &str) -> TransportError {
    TransportError::Request(msg.to_string())
}

/// A node whose answers are set up front.
///
/// Block answers are queued per height; once a queue is empty the height
/// reports "not found", like a node that has not produced it yet.
pub(crate) struct MockNode {
    pub status: NodeResult<NodeStatus>,
    pub push: NodeResult<PushResult>,
    pub commission: NodeResult<CommissionResult>,
    pub coin_buy: NodeResult<EstimateBuyResult>,
    pub coin_sell: NodeResult<EstimateSellResult>,
    pub address: NodeResult<AddressResult>,
    pub min_gas: NodeResult<MinGasPrice>,
    pub blocks: Mutex<HashMap<u64, VecDeque<NodeResult<Block>>>>,
    pub requested_heights: Mutex<Vec<u64>>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for MockNode {
    fn default() -> Self {
        Self {
            status: unscripted(),
            push: unscripted(),
            commission: unscripted(),
            coin_buy: unscripted(),
            coin_sell: unscripted(),
            address: unscripted(),
            min_gas: unscripted(),
            blocks: Mutex::new(HashMap::new()),
            requested_heights: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockNode {
    pub fn at_height(height: u64) -> Self {
        Self {
            status: Ok(NodeStatus {
                latest_block_height: height,
            }),
            ..Default::default()
        }
    }

    /// Queue an answer for `height`.
    pub fn script_block(&self, height: u64, answer: NodeResult<Block>) {
        self.blocks
            .lock()
            .unwrap()
            .entry(height)
            .or_default()
            .push_back(answer);
    }

    /// Queue a successful block made of the given hex transactions.
    pub fn script_txs(&self, height: u64, txs: &[&str]) {
        self.script_block(
            height,
            Ok(Block {
                height,
                transactions: txs.iter().map(|tx| RawTransaction::new(*tx)).collect(),
            }),
        );
    }

    pub fn requested_heights(&self) -> Vec<u64> {
        self.requested_heights.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NodeClient for MockNode {
    async fn status(&self) -> NodeResult<NodeStatus> {
        self.record("status".into());
        self.status.clone()
    }

    async fn block(&self, height: u64) -> NodeResult<Block> {
        self.requested_heights.lock().unwrap().push(height);
        self.blocks
            .lock()
            .unwrap()
            .get_mut(&height)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(NodeError::new("Block not found", 404).into()))
    }

    async fn send_transaction(&self, tx: &str) -> NodeResult<PushResult> {
        self.record(format!("send_transaction {}", tx));
        self.push.clone()
    }

    async fn estimate_tx_commission(&self, tx: &str) -> NodeResult<CommissionResult> {
        self.record(format!("estimate_tx_commission {}", tx));
        self.commission.clone()
    }

    async fn estimate_coin_buy(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value_to_buy: &str,
    ) -> NodeResult<EstimateBuyResult> {
        self.record(format!("estimate_coin_buy {} {} {}", coin_to_sell, coin_to_buy, value_to_buy));
        self.coin_buy.clone()
    }

    async fn estimate_coin_sell(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value_to_sell: &str,
    ) -> NodeResult<EstimateSellResult> {
        self.record(format!("estimate_coin_sell {} {} {}", coin_to_sell, coin_to_buy, value_to_sell));
        self.coin_sell.clone()
    }

    async fn address(&self, address: &str) -> NodeResult<AddressResult> {
        self.record(format!("address {}", address));
        self.address.clone()
    }

    async fn min_gas_price(&self) -> NodeResult<MinGasPrice> {
        self.record("min_gas_price".into());
        self.min_gas.clone()
    }
}
