//! Application routers and dispatcher assembly.
//!
//! # Data Flow
//! ```text
//! ServerConfig.mounts
//!     → users.rs  (mounted at mounts.users, token-gated account routes)
//!     → system.rs (mounted at mounts.system, health)
//!     → Dispatcher (users first, root mount last)
//! ```
//!
//! # Design Decisions
//! - The root-mounted router is registered last: it matches every path
//! - All routers share one `AuthHandler` as their credential verifier

pub mod system;
pub mod users;

use std::sync::Arc;

use crate::auth::{AuthHandler, CredentialVerifier};
use crate::config::ServerConfig;
use crate::routing::Dispatcher;

pub use users::{CredentialsDto, UserProfile, UsersState};

/// Mount every application router according to `config.mounts`.
pub fn build_dispatcher(config: &ServerConfig, auth: Arc<AuthHandler>) -> Dispatcher {
    let verifier: Arc<dyn CredentialVerifier> = auth.clone();

    Dispatcher::builder()
        .mount(
            &config.mounts.users,
            users::router(auth, config.security.max_body_size),
        )
        .mount(&config.mounts.system, system::router(verifier))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryUserStore;
    use axum::{body::Body, http::{Request, StatusCode}};

    fn dispatcher() -> Dispatcher {
        let mut config = ServerConfig::default();
        config.auth.bcrypt_cost = 4;
        let auth = Arc::new(AuthHandler::new(&config.auth, Arc::new(InMemoryUserStore::new())));
        build_dispatcher(&config, auth)
    }

    #[test]
    fn test_root_mount_is_last() {
        let dispatcher = dispatcher();
        let prefixes: Vec<_> = dispatcher.mounts().iter().map(|m| m.prefix()).collect();
        assert_eq!(prefixes, vec!["/users", "/"]);
        assert_eq!(dispatcher.select("/users/login").unwrap().router().name(), "users");
        assert_eq!(dispatcher.select("/health").unwrap().router().name(), "system");
    }

    #[tokio::test]
    async fn test_health() {
        let response = dispatcher()
            .dispatch(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
