//! Errors surfaced to facade callers.

use thiserror::Error;

use crate::node::{NodeCallError, NodeError, TransportError};

/// Either the node was unreachable, or it said no.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Node(#[from] NodeError),
}

impl From<NodeCallError> for GateError {
    fn from(err: NodeCallError) -> Self {
        match err {
            NodeCallError::Transport(e) => GateError::Transport(e),
            NodeCallError::Business(e) => GateError::Node(e),
        }
    }
}

impl GateError {
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Transport(_) => "transport",
            GateError::Node(_) => "node",
        }
    }

    /// Node-assigned code, when the node produced one.
    pub fn code(&self) -> Option<i64> {
        match self {
            GateError::Node(e) => Some(e.code),
            GateError::Transport(_) => None,
        }
    }
}

pub type GateResult<T> = Result<T, GateError>;
