//! Broadcast-channel backed event bus.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::bus::{BusError, Event, EventBus, Query, Tags};

/// In-memory bus for a single gateway process.
///
/// Publishing is refused until [`start`](Self::start) is called, mirroring a
/// broker that has to be brought up first. Events published while nobody is
/// subscribed are dropped.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<Event>,
    running: AtomicBool,
    published: AtomicU64,
}

impl InMemoryEventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            running: AtomicBool::new(false),
            published: AtomicU64::new(0),
        }
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        tracing::debug!("Event bus started");
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::debug!("Event bus stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Receive future events matching `query`.
    pub fn subscribe(&self, query: Query) -> Subscription {
        tracing::debug!(topic = %query.topic, tags = ?query.tags, "New subscription");
        Subscription {
            receiver: self.sender.subscribe(),
            query,
        }
    }

    /// Events accepted since startup.
    pub fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, topic: &str, tags: Tags) -> Result<(), BusError> {
        if !self.is_running() {
            return Err(BusError::NotStarted);
        }

        self.published.fetch_add(1, Ordering::Relaxed);

        // Err only means there are no receivers right now.
        let receivers = self
            .sender
            .send(Event {
                topic: topic.to_string(),
                tags,
            })
            .unwrap_or(0);
        tracing::trace!(topic, receivers, "Event published");
        Ok(())
    }
}

/// A filtered stream of events.
pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
    query: Query,
}

impl Subscription {
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Next matching event, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.query.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.query.topic, skipped, "Subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
