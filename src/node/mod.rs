//! Node access subsystem.
//!
//! # Data Flow
//! ```text
//! NodeConfig (API URL, timeout)
//!     → client.rs (HTTP calls with timeouts)
//!     → types.rs (envelope decoding, error classification)
//!     → tagged outcome: Ok | Transport | Business
//! ```
//!
//! Callers never inspect response shapes themselves; every envelope is
//! collapsed into a `NodeResult` here.

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{HttpNodeClient, NodeClient, SharedNodeClient};
pub use types::{
    Block, NodeCallError, NodeError, NodeResult, NodeStatus, RawTransaction, TransportError,
};
