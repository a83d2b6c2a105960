//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned to the caller
//! - The listener binds last, so traffic only arrives once routes exist

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::app::build_dispatcher;
use crate::auth::{AuthHandler, InMemoryUserStore, UserStore};
use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{Listener, ListenerError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// A server accepting connections on a background task.
#[derive(Debug)]
pub struct Running {
    pub local_addr: SocketAddr,
    pub handle: JoinHandle<Result<(), ListenerError>>,
}

/// Start the server with an in-memory user store.
pub async fn launch(config: ServerConfig, shutdown: &Shutdown) -> Result<Running, StartupError> {
    launch_with_store(config, Arc::new(InMemoryUserStore::new()), shutdown).await
}

/// Start the server over the given user store.
///
/// Returns once the listener is bound; the accept loop runs until
/// `shutdown` is triggered.
pub async fn launch_with_store(
    config: ServerConfig,
    store: Arc<dyn UserStore>,
    shutdown: &Shutdown,
) -> Result<Running, StartupError> {
    let auth = Arc::new(AuthHandler::new(&config.auth, store));
    let dispatcher = Arc::new(build_dispatcher(&config, auth));

    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

    let server = HttpServer::new(config, dispatcher);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tracing::info!(address = %local_addr, "Server ready");
    Ok(Running { local_addr, handle })
}
