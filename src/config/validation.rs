//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GateConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node.api_url '{0}' is not a valid URL")]
    InvalidNodeUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("ingestion.topic must not be empty")]
    EmptyTopic,

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.push_wait_timeout_secs ({wait}) must be below listener.request_timeout_secs ({request})")]
    PushWaitTooLong { wait: u64, request: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.node.api_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidNodeUrl(config.node.api_url.clone())),
    }

    if config.node.timeout_secs == 0 {
        errors.push(ValidationError::Zero("node.timeout_secs"));
    }
    if config.ingestion.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("ingestion.poll_interval_ms"));
    }
    if config.ingestion.retry_interval_ms == 0 {
        errors.push(ValidationError::Zero("ingestion.retry_interval_ms"));
    }
    if config.ingestion.topic.trim().is_empty() {
        errors.push(ValidationError::EmptyTopic);
    }
    if config.bus.capacity == 0 {
        errors.push(ValidationError::Zero("bus.capacity"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("listener.request_timeout_secs"));
    }
    if config.listener.push_wait_timeout_secs == 0 {
        errors.push(ValidationError::Zero("listener.push_wait_timeout_secs"));
    } else if config.listener.push_wait_timeout_secs >= config.listener.request_timeout_secs {
        errors.push(ValidationError::PushWaitTooLong {
            wait: config.listener.push_wait_timeout_secs,
            request: config.listener.request_timeout_secs,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
