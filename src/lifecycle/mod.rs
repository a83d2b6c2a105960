//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → User store + auth → Routers → Dispatcher → Listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → In-flight connections finish on their tasks
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - Any startup error is fatal and returned to the caller

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
pub use startup::{launch, launch_with_store, Running, StartupError};
