//! The block ingestion loop.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::bus::{tx_tags, EventBus};
use crate::config::IngestionConfig;
use crate::node::{Block, NodeCallError, SharedNodeClient};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Without the node's height there is no cursor to start from.
    #[error("failed to read initial chain height: {0}")]
    InitialHeight(#[source] NodeCallError),
}

/// What a single iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Block processed; the cursor moved past `height`.
    Advanced {
        height: u64,
        published: usize,
        failed: usize,
    },
    /// Fetch failed; `height` will be requested again.
    Retry { height: u64 },
}

/// Follows the chain one block at a time and republishes transactions.
///
/// The cursor lives here and nowhere else.
pub struct BlockIngestor {
    node: SharedNodeClient,
    bus: Arc<dyn EventBus>,
    config: IngestionConfig,
    cursor: u64,
}

impl BlockIngestor {
    /// Read the node's current height and position the cursor on it.
    pub async fn start(
        node: SharedNodeClient,
        bus: Arc<dyn EventBus>,
        config: IngestionConfig,
    ) -> Result<Self, IngestError> {
        let status = node.status().await.map_err(IngestError::InitialHeight)?;
        let cursor = status.latest_block_height;

        tracing::info!(height = cursor, topic = %config.topic, "Starting with block");
        metrics::record_cursor(cursor);

        Ok(Self {
            node,
            bus,
            config,
            cursor,
        })
    }

    /// Next height to fetch.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Fetch the block at the cursor and publish its transactions.
    ///
    /// Does not sleep; pacing is done by [`run`](Self::run).
    pub async fn step(&mut self) -> StepOutcome {
        let height = self.cursor;

        let block = match self.node.block(height).await {
            Ok(block) => block,
            Err(e) => {
                // Usually the node has not produced this height yet.
                tracing::debug!(height, error = %e, "Block not available, retrying");
                metrics::record_block_fetch_failure();
                return StepOutcome::Retry { height };
            }
        };

        let (published, failed) = self.publish_block(&block).await;

        self.cursor += 1;
        metrics::record_block_ingested(height);

        tracing::debug!(height, published, failed, "Block ingested");
        StepOutcome::Advanced {
            height,
            published,
            failed,
        }
    }

    async fn publish_block(&self, block: &Block) -> (usize, usize) {
        let mut published = 0;
        let mut failed = 0;

        for (index, tx) in block.transactions.iter().enumerate() {
            let upper_hex = match tx.to_upper_hex() {
                Ok(hex) => hex,
                Err(e) => {
                    tracing::error!(height = block.height, index, raw_tx = %tx.as_str(), error = %e, "Undecodable transaction skipped");
                    failed += 1;
                    continue;
                }
            };

            match self.bus.publish(&self.config.topic, tx_tags(upper_hex)).await {
                Ok(()) => {
                    published += 1;
                    metrics::record_transaction_published();
                }
                Err(e) => {
                    tracing::error!(height = block.height, index, error = %e, "Failed to publish transaction");
                    failed += 1;
                    metrics::record_publish_failure();
                }
            }
        }

        (published, failed)
    }

    /// Run until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let retry_interval = Duration::from_millis(self.config.retry_interval_ms);

        loop {
            let pause = match self.step().await {
                StepOutcome::Advanced { .. } => poll_interval,
                StepOutcome::Retry { .. } => retry_interval,
            };

            tokio::select! {
                _ = sleep(pause) => {}
                _ = shutdown.recv() => {
                    tracing::info!(cursor = self.cursor, "Block ingestion stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusError, Tags, NEW_TX_TOPIC, TX_TAG};
    use crate::lifecycle::Shutdown;
    use crate::node::mock::{transport_error, MockNode};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every publish; optionally fails the n-th ones.
    #[derive(Default)]
    struct RecordingBus {
        events: Mutex<Vec<(String, Tags)>>,
        fail_calls: Vec<usize>,
        calls: Mutex<usize>,
    }

    impl RecordingBus {
        fn failing_on(calls: &[usize]) -> Self {
            Self {
                fail_calls: calls.to_vec(),
                ..Default::default()
            }
        }

        fn txs(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|(_, tags)| tags[TX_TAG].clone())
                .collect()
        }
    }

    #[async_trait]
    impl EventBus for RecordingBus {
        async fn publish(&self, topic: &str, tags: Tags) -> Result<(), BusError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if self.fail_calls.contains(&call) {
                return Err(BusError::NotStarted);
            }
            self.events.lock().unwrap().push((topic.to_string(), tags));
            Ok(())
        }
    }

    fn config() -> IngestionConfig {
        IngestionConfig {
            poll_interval_ms: 5,
            retry_interval_ms: 5,
            ..Default::default()
        }
    }

    async fn ingestor(node: Arc<MockNode>, bus: Arc<RecordingBus>) -> BlockIngestor {
        BlockIngestor::start(node, bus, config()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_fetch_targets_reported_height() {
        let node = Arc::new(MockNode::at_height(1000));
        node.script_txs(1000, &[]);
        let bus = Arc::new(RecordingBus::default());

        let mut ingestor = ingestor(node.clone(), bus).await;
        assert_eq!(ingestor.cursor(), 1000);

        ingestor.step().await;
        assert_eq!(node.requested_heights(), vec![1000]);
        assert_eq!(ingestor.cursor(), 1001);
    }

    #[tokio::test]
    async fn test_start_fails_without_height() {
        let node = Arc::new(MockNode {
            status: Err(transport_error("connection refused").into()),
            ..Default::default()
        });
        let result = BlockIngestor::start(node, Arc::new(RecordingBus::default()), config()).await;
        assert!(matches!(result, Err(IngestError::InitialHeight(NodeCallError::Transport(_)))));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_cursor() {
        let node = Arc::new(MockNode::at_height(50));
        node.script_block(50, Err(transport_error("timeout").into()));
        node.script_block(50, Err(transport_error("reset").into()));
        node.script_txs(50, &["0a", "0b"]);
        let bus = Arc::new(RecordingBus::default());

        let mut ingestor = ingestor(node.clone(), bus.clone()).await;

        for _ in 0..2 {
            assert_eq!(ingestor.step().await, StepOutcome::Retry { height: 50 });
            assert_eq!(ingestor.cursor(), 50);
            assert!(bus.txs().is_empty());
        }

        assert_eq!(
            ingestor.step().await,
            StepOutcome::Advanced {
                height: 50,
                published: 2,
                failed: 0
            }
        );
        assert_eq!(bus.txs(), vec!["0A", "0B"]);
        assert_eq!(node.requested_heights(), vec![50, 50, 50]);
    }

    #[tokio::test]
    async fn test_heights_in_order_each_tx_once() {
        let node = Arc::new(MockNode::at_height(7));
        node.script_txs(7, &["aa", "bb"]);
        node.script_txs(8, &[]);
        node.script_txs(9, &["0xcc"]);
        let bus = Arc::new(RecordingBus::default());

        let mut ingestor = ingestor(node.clone(), bus.clone()).await;
        for _ in 0..4 {
            ingestor.step().await;
        }

        // Height 10 is not produced yet.
        assert_eq!(node.requested_heights(), vec![7, 8, 9, 10]);
        assert_eq!(ingestor.cursor(), 10);
        assert_eq!(bus.txs(), vec!["AA", "BB", "CC"]);
        assert!(bus
            .events
            .lock()
            .unwrap()
            .iter()
            .all(|(topic, _)| topic == NEW_TX_TOPIC));
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_block_cursor() {
        let node = Arc::new(MockNode::at_height(1));
        node.script_txs(1, &["01", "02", "03"]);
        let bus = Arc::new(RecordingBus::failing_on(&[2]));

        let mut ingestor = ingestor(node, bus.clone()).await;
        let outcome = ingestor.step().await;

        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                height: 1,
                published: 2,
                failed: 1
            }
        );
        assert_eq!(bus.txs(), vec!["01", "03"]);
        assert_eq!(ingestor.cursor(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_transaction_skipped() {
        let node = Arc::new(MockNode::at_height(3));
        node.script_txs(3, &["zz", "ff"]);
        let bus = Arc::new(RecordingBus::default());

        let mut ingestor = ingestor(node, bus.clone()).await;
        ingestor.step().await;

        assert_eq!(bus.txs(), vec!["FF"]);
        assert_eq!(ingestor.cursor(), 4);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let node = Arc::new(MockNode::at_height(1));
        node.script_txs(1, &["01"]);
        node.script_txs(2, &["02"]);
        let bus = Arc::new(RecordingBus::default());
        let shutdown = Shutdown::new();

        let ingestor = ingestor(node.clone(), bus.clone()).await;
        let handle = tokio::spawn(ingestor.run(shutdown.subscribe()));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop should stop")
            .unwrap();

        assert_eq!(bus.txs(), vec!["01", "02"]);
        let heights = node.requested_heights();
        assert_eq!(&heights[..2], &[1, 2]);
        assert!(heights[2..].iter().all(|h| *h == 3));
    }
}
