//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Login:
//!     credentials → handler.rs (bcrypt verify against store.rs)
//!     → token.rs (sign HS256 claims) → bearer token
//!
//! Request gate (per protected route):
//!     Authorization header → verifier.rs (extract bearer)
//!     → CredentialVerifier::verify → allow / 401
//! ```
//!
//! # Design Decisions
//! - No session store: every request re-validates its token
//! - Verification failures are a single `false`, never a reason
//! - Routers depend on the `CredentialVerifier` trait only

pub mod handler;
pub mod store;
pub mod token;
pub mod verifier;

pub use handler::{AuthError, AuthHandler};
pub use store::{InMemoryUserStore, UserRecord, UserStore};
pub use token::{Claims, TokenCodec};
pub use verifier::{bearer_token, CredentialVerifier};
