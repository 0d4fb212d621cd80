//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Resolve controller tree → Install routes → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes, then listeners
//! - A startup error means nothing is served

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Application, ApplicationBuilder, StartupError};
