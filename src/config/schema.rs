//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so an empty file (or no file) is a valid config.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Node API connection settings.
    pub node: NodeConfig,

    /// Block ingestion loop settings.
    pub ingestion: IngestionConfig,

    /// In-process event bus settings.
    pub bus: BusConfig,

    /// Public HTTP/WebSocket listener.
    pub listener: ListenerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Node API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Base URL of the node REST API (e.g., "http://localhost:8841").
    pub api_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8841".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Block ingestion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Run the ingestion loop.
    pub enabled: bool,

    /// Topic new transactions are published on.
    pub topic: String,

    /// Pause after a block was processed, in milliseconds.
    pub poll_interval_ms: u64,

    /// Pause before re-fetching a height that failed, in milliseconds.
    pub retry_interval_ms: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            topic: crate::bus::NEW_TX_TOPIC.to_string(),
            poll_interval_ms: 1000,
            retry_interval_ms: 1000,
        }
    }
}

/// Event bus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusConfig {
    /// Broadcast channel capacity. Slow subscribers lagging further behind skip events.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// How long a push waits for its transaction to show up in a block.
    pub push_wait_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            push_wait_timeout_secs: 15,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
