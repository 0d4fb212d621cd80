//! Configuration loading from disk.
//!
//! An application keeps its configuration under `app/config/`:
//!
//! ```text
//! app/config/config.toml          base settings
//! app/config/envs/all.toml        shared by every environment
//! app/config/envs/<env>.toml      selected by `environment`
//! ```
//!
//! Later files override earlier ones table by table. Missing files are
//! skipped with a warning.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::FrameworkConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

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

/// Load and validate configuration from a single TOML file.
pub fn load_config(path: &Path) -> Result<FrameworkConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    finish(table, path)
}

/// Load the layered configuration of the application at `root`.
pub fn load_app_config(root: &Path) -> Result<FrameworkConfig, ConfigError> {
    let config_dir = root.join("app").join("config");
    let base_path = config_dir.join("config.toml");

    let mut table = match read_table(&base_path)? {
        Some(table) => table,
        None => {
            tracing::warn!(path = %base_path.display(), "Config file not found, using defaults");
            toml::Table::new()
        }
    };

    let environment = table
        .get("environment")
        .and_then(toml::Value::as_str)
        .filter(|env| !env.is_empty())
        .map(str::to_string);

    let mut overlays = vec![config_dir.join("envs").join("all.toml")];
    if let Some(env) = &environment {
        overlays.push(config_dir.join("envs").join(format!("{env}.toml")));
    }
    for overlay in overlays {
        match read_table(&overlay)? {
            Some(layer) => {
                tracing::debug!(path = %overlay.display(), "Applying config overlay");
                merge_tables(&mut table, layer);
            }
            None => tracing::debug!(path = %overlay.display(), "No config overlay"),
        }
    }

    finish(table, &base_path)
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn finish(table: toml::Table, path: &Path) -> Result<FrameworkConfig, ConfigError> {
    let config: FrameworkConfig =
        toml::Value::Table(table)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Recursively overlay `layer` onto `base`; tables merge, everything else replaces.
fn merge_tables(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        let incoming = match value {
            toml::Value::Table(incoming) => incoming,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}
