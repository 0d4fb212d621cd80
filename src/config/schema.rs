//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for an application.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for an application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Environment name; selects `app/config/envs/<environment>.toml`.
    pub environment: String,

    /// Listener and request handling.
    pub server: ServerConfig,

    /// Convention routing settings.
    pub routes: RoutesConfig,

    /// Framework-owned static mounts.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:4242").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4242".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Convention routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Controller served at the application root.
    pub main_controller: String,

    /// View used when a controller is requested without naming one.
    pub main_view: String,

    /// Expose models through the REST data endpoint (owned by the data layer).
    pub allow_rest: bool,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            main_controller: "main".to_string(),
            main_view: "index".to_string(),
            allow_rest: true,
        }
    }
}

/// Static mounts served next to the controller routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Serve `app/static` under `/static`.
    pub serve_static: bool,

    /// Serve `app/backbone-models` under `/backbone-models`.
    pub serve_client_models: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            serve_static: true,
            serve_client_models: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FrameworkConfig::default();
        assert_eq!(config.routes.main_controller, "main");
        assert_eq!(config.routes.main_view, "index");
        assert!(config.routes.allow_rest);
        assert_eq!(config.server.bind_address, "0.0.0.0:4242");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FrameworkConfig = toml::from_str(
            r#"
            environment = "dev"

            [routes]
            main_view = "home"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.environment, "dev");
        assert_eq!(config.routes.main_view, "home");
        assert_eq!(config.routes.main_controller, "main");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.server.request_timeout_secs, 30);
    }
}
