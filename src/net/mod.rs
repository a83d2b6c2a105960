//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → one task per connection (http::server)
//!     → permit released when the connection task ends
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - The only shared mutable state in the request path is the listener itself

pub mod listener;

pub use listener::{ConnectionPermit, Listener, ListenerError};
