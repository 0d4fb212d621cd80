//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! app/config/config.toml (+ envs/all.toml, envs/<env>.toml)
//!     → loader.rs (read, layer & deserialize)
//!     → validation.rs (semantic checks)
//!     → FrameworkConfig (validated, immutable)
//!     → shared via AppContext with every handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is built from it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_app_config, load_config, ConfigError};
pub use schema::FrameworkConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::RoutesConfig;
pub use schema::ServerConfig;
pub use schema::StaticFilesConfig;
