//! Controller definitions and how they are loaded.
//!
//! # Data Flow
//! ```text
//! app/controllers/<name>/            (directory found by the walker)
//!     → loader.rs (ControllerLoader: compiled-in registry, or ...)
//!     → manifest.rs (... index.toml + named actions)
//!     → descriptor.rs (ControllerDefinition → ControllerDescriptor with lineage)
//! ```
//!
//! # Design Decisions
//! - Definitions are plain data; loading code is behind a trait
//! - Views are a closed three-way enum, matched exhaustively downstream

pub mod descriptor;
pub mod loader;
pub mod manifest;

pub use descriptor::{
    ConfiguredView, ControllerDefinition, ControllerDescriptor, ViewAction, ViewDefinition,
    ViewDefinitionKind,
};
pub use loader::{ControllerLoader, RegistryLoader};
pub use manifest::{ManifestLoader, MANIFEST_FILE};
