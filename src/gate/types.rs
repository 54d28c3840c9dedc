//! Payloads returned by the facade.

use std::fmt;

use serde::Serialize;

/// Prefix downstream consumers expect on transaction hashes.
pub const HASH_PREFIX: &str = "Mt";

/// Hash of an accepted transaction: `Mt` + lower-case hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransactionHash(String);

impl TransactionHash {
    pub fn from_node_hash(hash: &str) -> Self {
        Self(format!("{}{}", HASH_PREFIX, hash.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversion estimate. `value` is what the caller pays (buy) or gets (sell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinEstimate {
    pub value: String,
    pub commission: String,
}
