//! Node wire types and error definitions.
//!
//! The node answers every call with a JSON envelope carrying either a
//! `result` or an `error` object. Numbers frequently arrive as strings.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Message used when the node signals failure through a status code only.
pub const GENERIC_NODE_ERROR: &str = "node rejected the request";

/// The node could not be reached, or what it answered could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, reset, DNS failure and the like.
    #[error("node request failed: {0}")]
    Request(String),

    /// Request did not complete in time.
    #[error("node request timed out after {0} seconds")]
    Timeout(u64),

    /// Response body is not a node envelope.
    #[error("malformed node response: {0}")]
    Malformed(String),
}

/// A semantic rejection reported by the node, with its node-assigned code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node error {code}: {message}")]
pub struct NodeError {
    pub message: String,
    pub code: i64,
}

impl NodeError {
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Unify the two ways a node reports failure.
    ///
    /// A structured error is taken verbatim. Without one, a non-zero result
    /// code becomes an error with a generic message. `None` means success.
    pub fn classify(error: Option<NodeErrorBody>, code: i64) -> Option<Self> {
        match error {
            Some(body) => Some(body.into()),
            None if code != 0 => Some(Self::new(GENERIC_NODE_ERROR, code)),
            None => None,
        }
    }
}

/// Outcome of a node call, decided once at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeCallError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Business(#[from] NodeError),
}

impl NodeCallError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeCallError::Transport(_) => "transport",
            NodeCallError::Business(_) => "node",
        }
    }
}

/// Result type for node calls.
pub type NodeResult<T> = Result<T, NodeCallError>;

/// Structured error object inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeErrorBody {
    #[serde(deserialize_with = "number_or_string")]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl From<NodeErrorBody> for NodeError {
    fn from(body: NodeErrorBody) -> Self {
        Self::new(body.message, body.code)
    }
}

/// Response envelope shared by every node endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<NodeErrorBody>,
}

impl<T> Envelope<T> {
    /// Collapse into a tagged outcome. A structured error wins over a result.
    pub fn into_result(self) -> NodeResult<T> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(NodeError::from(error).into()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(TransportError::Malformed(
                "envelope carries neither result nor error".to_string(),
            )
            .into()),
        }
    }
}

/// Chain status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeStatus {
    #[serde(deserialize_with = "number_or_string")]
    pub latest_block_height: u64,
}

/// A transaction exactly as the node encoded it inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockTransaction {
    pub raw_tx: String,
}

/// Block payload as returned by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResult {
    #[serde(default)]
    pub transactions: Option<Vec<BlockTransaction>>,
}

/// A fetched block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub height: u64,
    pub transactions: Vec<RawTransaction>,
}

impl Block {
    pub fn from_result(height: u64, result: BlockResult) -> Self {
        Self {
            height,
            transactions: result
                .transactions
                .unwrap_or_default()
                .into_iter()
                .map(|tx| RawTransaction::new(tx.raw_tx))
                .collect(),
        }
    }
}

/// Opaque transaction bytes, carried in the node's hex encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction(String);

impl RawTransaction {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Hex as the node reported it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to raw bytes. A leading `0x` is accepted.
    pub fn decode(&self) -> Result<Vec<u8>, hex::FromHexError> {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        hex::decode(digits)
    }

    /// Canonical upper-case hex of the decoded bytes.
    pub fn to_upper_hex(&self) -> Result<String, hex::FromHexError> {
        self.decode().map(hex::encode_upper)
    }
}

/// Result of `send_transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushResult {
    /// Absent when the node rejects the transaction by code.
    #[serde(default)]
    pub hash: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub code: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommissionResult {
    #[serde(deserialize_with = "string_or_number")]
    pub commission: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstimateBuyResult {
    #[serde(deserialize_with = "string_or_number")]
    pub will_pay: String,
    #[serde(deserialize_with = "string_or_number")]
    pub commission: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstimateSellResult {
    #[serde(deserialize_with = "string_or_number")]
    pub will_get: String,
    #[serde(deserialize_with = "string_or_number")]
    pub commission: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressResult {
    #[serde(deserialize_with = "string_or_number")]
    pub transaction_count: String,
}

/// Minimum gas price; the node sends a bare value as `result`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MinGasPrice(#[serde(deserialize_with = "string_or_number")] pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

/// Accept `5` as well as `"5"`.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Keep decimal quantities as strings; never round-trip them through floats.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::<serde_json::Number>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.to_string()),
        NumberOrString::String(s) => Ok(s),
    }
}
