//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, protocol detection, request ID, timeout)
//!     → routing::Dispatcher (mount, route, auth gate)
//!     → handler, using request.rs to read bodies
//!     → response.rs (status + body shaping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{read_body, read_json, request_id, BodyError, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
