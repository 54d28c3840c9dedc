//! Public HTTP/WebSocket API.
//!
//! # Data Flow
//! ```text
//! client request
//!     → server.rs (Axum router, timeout, tracing)
//!     → handlers.rs (decode input, call Gate)
//!     → response.rs ({"data"} or {"error": {code, message}})
//!
//! client WebSocket
//!     → websocket.rs (bus subscription relayed as JSON frames)
//! ```

pub mod handlers;
pub mod response;
pub mod server;
pub mod websocket;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
