//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Node API base URL override.
pub const NODE_API_ENV_VAR: &str = "NODE_API";
/// `1` switches to JSON logs at warn level.
pub const DEBUG_ENV_VAR: &str = "GATE_DEBUG";
/// Listener bind address override.
pub const LISTEN_ENV_VAR: &str = "GATE_LISTEN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the effective configuration.
///
/// Starts from the file when given (defaults otherwise), applies environment
/// overrides, then validates the result.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => GateConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment-style overrides using `lookup` to resolve variables.
pub fn apply_overrides<F>(config: &mut GateConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(NODE_API_ENV_VAR).filter(|v| !v.is_empty()) {
        config.node.api_url = url;
    }

    if let Some(addr) = lookup(LISTEN_ENV_VAR).filter(|v| !v.is_empty()) {
        config.listener.bind_address = addr;
    }

    if lookup(DEBUG_ENV_VAR).as_deref() == Some("1") {
        config.observability.json_logs = true;
        config.observability.log_level = "warn".to_string();
    }
}
