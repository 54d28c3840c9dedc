//! Client-facing facade over the node.
//!
//! Each operation maps 1:1 onto a node call. Failures are logged with the
//! operation's inputs and returned as [`GateError`]; successes are not logged.

pub mod errors;
pub mod facade;
pub mod types;

pub use errors::{GateError, GateResult};
pub use facade::Gate;
pub use types::{CoinEstimate, TransactionHash};
