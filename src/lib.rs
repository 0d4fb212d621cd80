//! Cadenza: convention-based routing for web applications.
//!
//! Controllers live in directories under `app/controllers`; their views become
//! routes without any route file. The engine walks the tree breadth-first,
//! checks names, parses each view key and binds the result into an ordered
//! route table that an HTTP dispatcher installs in one go.

// Core subsystems
pub mod config;
pub mod controller;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::FrameworkConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown, StartupError};
pub use routing::{resolve_routes, RouteError, RouteTable};
