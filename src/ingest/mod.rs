//! Block ingestion.
//!
//! # Data Flow
//! ```text
//! node.status() ─ once at startup ─▶ cursor = latest height
//!
//! loop:
//!     node.block(cursor)
//!         ├─ error  → sleep(retry_interval), same cursor
//!         └─ ok     → publish every tx on NewTx{tx=UPPERHEX}
//!                     cursor += 1, sleep(poll_interval)
//! ```
//!
//! # Invariants
//! - Heights are fetched strictly in order; a height is never skipped.
//! - Every transaction of a served block is published once before the next
//!   height is requested.
//! - After startup no error stops the loop; only shutdown does.

pub mod ingestor;

pub use ingestor::{BlockIngestor, IngestError, StepOutcome};
