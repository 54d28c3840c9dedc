//! Response shaping.
//!
//! Success bodies are `{"data": ...}`; failures are
//! `{"error": {"code": .., "message": ..}}` with the node's code preserved.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::gate::GateError;

/// Code reported when the node could not be reached.
pub const TRANSPORT_ERROR_CODE: i64 = 1;
/// Code reported for malformed client input.
pub const BAD_REQUEST_CODE: i64 = 2;
/// Code reported when a pushed transaction was not seen in time.
pub const NOT_INCLUDED_CODE: i64 = 3;

/// An error rendered as an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i64,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: BAD_REQUEST_CODE,
            message: message.into(),
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Node(e) => Self {
                status: StatusCode::BAD_REQUEST,
                code: e.code,
                message: e.message,
            },
            GateError::Transport(e) => Self {
                status: StatusCode::BAD_GATEWAY,
                code: TRANSPORT_ERROR_CODE,
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

/// Wrap a payload in the success envelope.
pub fn data<T: Serialize>(payload: T) -> Response {
    (StatusCode::OK, Json(json!({ "data": payload }))).into_response()
}
