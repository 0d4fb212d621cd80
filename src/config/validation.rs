//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that routing names can actually name a controller directory and a view
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! `server.bind_address` is `host:port`; the host may be a name
//! (`localhost:4242`) since the listener resolves it. The metrics address is
//! handed to the exporter as-is and must be a literal socket address.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FrameworkConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::FrameworkConfig;
use crate::routing::grammar::has_route_metachars;
use crate::routing::naming::is_reserved;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `routes.main_view`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a loaded configuration.
pub fn validate_config(config: &FrameworkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let main_controller = &config.routes.main_controller;
    if main_controller.is_empty() {
        errors.push(ValidationError::new("routes.main_controller", "must not be empty"));
    } else if main_controller.contains(['.', '/', '\\'])
        || main_controller.chars().any(char::is_whitespace)
        || has_route_metachars(main_controller)
    {
        errors.push(ValidationError::new(
            "routes.main_controller",
            format!("\"{main_controller}\" is not a valid controller directory name"),
        ));
    } else if is_reserved(main_controller) {
        errors.push(ValidationError::new(
            "routes.main_controller",
            format!("\"{main_controller}\" is reserved by the framework"),
        ));
    }

    if config.routes.main_view.is_empty() {
        errors.push(ValidationError::new("routes.main_view", "must not be empty"));
    }

    if !is_host_port(&config.server.bind_address) {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("\"{}\" is not a host:port address", config.server.bind_address),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "\"{}\" is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `127.0.0.1:80`, `[::1]:80` or `localhost:80`.
fn is_host_port(address: &str) -> bool {
    if address.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match address.rsplit_once(':') {
        Some((host, port)) => {
            port.parse::<u16>().is_ok()
                && !host.is_empty()
                && host
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        }
        None => false,
    }
}
