//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, headers)
//!     → dispatcher.rs (select mount by prefix)
//!     → router.rs (strip prefix via path.rs)
//!     → table.rs (exact lookup, then pattern.rs scan)
//!     → method check → bearer gate (auth::CredentialVerifier)
//!     → handler.rs (application logic)
//!
//! Route Compilation (at startup):
//!     RouterBuilder::route / ::pattern
//!     → RouteTable (exact map + ordered templates)
//!     → Freeze as immutable Router
//!     → DispatcherBuilder::mount (ordered prefixes)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path (segment comparison only)
//! - Deterministic: exact beats pattern, first registered template wins
//! - Explicit 404/405/401 rather than silent defaults

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod path;
pub mod pattern;
pub mod router;
pub mod table;

pub use dispatcher::{Dispatcher, DispatcherBuilder, MountedRouter};
pub use error::RouteError;
pub use handler::{with_state, BoxedHandler, Handler, HandlerResult};
pub use pattern::{Params, PathPattern};
pub use router::{Router, RouterBuilder};
pub use table::{Endpoint, RouteTable};
