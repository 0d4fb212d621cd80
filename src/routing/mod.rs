//! Convention-based route resolution.
//!
//! # Data Flow
//! ```text
//! Startup (once):
//!     walker.rs   (BFS over app/controllers, main controller first)
//!     → naming.rs (reserved segments, duplicate views)
//!     → grammar.rs (view key + definition → RouteSpec)
//!     → binder.rs  (RouteSpec → RouteBinding, middleware chains)
//!     → RouteTable (complete, ordered)
//!     → Dispatcher (installed only if everything resolved)
//! ```
//!
//! # Design Decisions
//! - Resolution is synchronous and single-threaded; it runs before the listener binds
//! - Fail fast: the first error aborts startup, no partial table is installed
//! - Deterministic: the same tree always yields the same ordered table

pub mod binder;
pub mod error;
pub mod grammar;
pub mod naming;
pub mod resolve;
pub mod walker;

pub use binder::{BindingKind, Dispatcher, RouteBinder, RouteBinding, RouteTable};
pub use error::{RouteError, RouteResult};
pub use grammar::{parse_view, RouteSpec, Verb};
pub use resolve::resolve_routes;
pub use walker::ControllerWalker;
