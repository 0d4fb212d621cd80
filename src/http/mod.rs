//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, framework mounts, layers)
//!     → request.rs (request ID)
//!     → dispatcher.rs (matched route → RequestContext)
//!     → middleware.rs (named chain, first listed runs first)
//!     → handler.rs (action or static view)
//!     → Send to client
//! ```

pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod server;

pub use context::{AppContext, PathParams, RequestContext};
pub use dispatcher::AxumDispatcher;
pub use handler::{handler, static_file, ActionRegistry, Handler};
pub use middleware::{compose, middleware, Middleware, MiddlewareRegistry};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
