//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the dispatcher in an Axum service with middleware layers
//! - Configure HTTP/1.1 and HTTP/2 support per connection
//! - Wire up middleware (tracing, request ID, timeout)
//! - Accept connections and serve each on its own task

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
    service::TowerToHyperService,
};
use tokio::sync::broadcast;
use tracing::Instrument;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::net::{Listener, ListenerError};
use crate::routing::Dispatcher;

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server fronting the dispatcher.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let router = Self::build_router(&config, AppState { dispatcher });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every path goes through the fallback; route matching is the
    /// dispatcher's job.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum service, for in-process testing.
    pub fn service(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer_addr, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(ListenerError::Accept(e)) => {
                            tracing::warn!(error = %e, "Accept failed");
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    let service = TowerToHyperService::new(self.router.clone());
                    tokio::spawn(async move {
                        let _permit = permit;
                        let io = TokioIo::new(stream);
                        if let Err(e) = auto::Builder::new(TokioExecutor::new())
                            .serve_connection(io, service)
                            .await
                        {
                            tracing::debug!(
                                peer_addr = %peer_addr,
                                error = %e,
                                "Connection ended with error"
                            );
                        }
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Single entry point: every request is handed to the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = crate::http::request::request_id(&request)
        .unwrap_or("unknown")
        .to_string();
    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        "Dispatching request"
    );

    let span = tracing::debug_span!("dispatch", request_id = %request_id);
    state.dispatcher.dispatch(request).instrument(span).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialVerifier;
    use crate::routing::{HandlerResult, Params, Router as RouteRouter};
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use tower::ServiceExt;

    struct AllowAll;

    impl CredentialVerifier for AllowAll {
        fn verify(&self, _token: &str) -> bool {
            true
        }

        fn subject_of(&self, _token: &str) -> Option<String> {
            None
        }
    }

    async fn ping(_req: Request<Body>, _params: Params) -> HandlerResult {
        Ok("pong".into_response())
    }

    fn server() -> HttpServer {
        let router = RouteRouter::builder("system", Arc::new(AllowAll))
            .route(Method::GET, "/ping", ping, false)
            .build();
        let dispatcher = Dispatcher::builder().mount("/", router).build();
        HttpServer::new(ServerConfig::default(), Arc::new(dispatcher))
    }

    #[tokio::test]
    async fn test_request_id_is_assigned_and_propagated() {
        let response = server()
            .service()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = server()
            .service()
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
