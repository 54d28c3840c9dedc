//! Minter gateway library.
//!
//! Follows the node block by block, republishing every transaction on an
//! in-process event bus, and fronts the node's client-facing calls with a
//! facade that normalizes its errors.

// Core
pub mod bus;
pub mod gate;
pub mod ingest;
pub mod node;

// Outer surfaces
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use gate::Gate;
pub use http::HttpServer;
pub use ingest::BlockIngestor;
pub use lifecycle::Shutdown;
