//! Lifecycle management.
//!
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging → Read node height → Start ingestion → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → ingestion loop exits, HTTP server drains
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
