//! In-process publish/subscribe.
//!
//! # Data Flow
//! ```text
//! ingestion loop ── publish(topic, tags) ──▶ EventBus ──▶ Subscription(Query) ──▶ API relays
//! ```
//!
//! Publishers only see the [`EventBus`] trait, so a different broker can be
//! swapped in without touching the ingestion loop.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use memory::{InMemoryEventBus, Subscription};

/// Topic new transactions are published on.
pub const NEW_TX_TOPIC: &str = "NewTx";

/// Tag carrying the upper-case hex of a transaction's raw bytes.
pub const TX_TAG: &str = "tx";

/// Event attributes subscribers filter on.
pub type Tags = BTreeMap<String, String>;

/// A published event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub topic: String,
    pub tags: Tags,
}

/// Errors surfaced by a publish.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("event bus is not running")]
    NotStarted,
}

/// Publishing side of the bus.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, topic: &str, tags: Tags) -> Result<(), BusError>;
}

/// Subscription filter: a topic plus tags that must all match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub topic: String,
    pub tags: Tags,
}

impl Query {
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tags: Tags::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.topic == event.topic
            && self
                .tags
                .iter()
                .all(|(k, v)| event.tags.get(k).is_some_and(|ev| ev == v))
    }
}

/// Tags for a new-transaction event.
pub fn tx_tags(upper_hex: impl Into<String>) -> Tags {
    Tags::from([(TX_TAG.to_string(), upper_hex.into())])
}
