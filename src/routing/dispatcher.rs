//! Process-wide entry point over the mounted routers.
//!
//! # Responsibilities
//! - Select the router whose mount prefix matches the request path
//! - Delegate resolution with that prefix as base path
//! - Convert handler errors and panics into `500`
//! - Record per-request metrics
//!
//! # Design Decisions
//! - Mounts are ordered; first matching prefix wins
//! - Prefix comparison is ASCII case-insensitive
//! - This is the only place handler faults become responses

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::observability::metrics;
use crate::routing::error::RouteError;
use crate::routing::path::{normalize, starts_with_ignore_case};
use crate::routing::router::Router;

const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// A router bound to a URL prefix.
#[derive(Debug, Clone)]
pub struct MountedRouter {
    prefix: String,
    router: Arc<Router>,
}

impl MountedRouter {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Ordered set of mounted routers, fixed at startup.
#[derive(Debug, Default)]
pub struct Dispatcher {
    mounts: Vec<MountedRouter>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    pub fn mounts(&self) -> &[MountedRouter] {
        &self.mounts
    }

    /// The mount that would receive `path`, if any.
    pub fn select(&self, path: &str) -> Option<&MountedRouter> {
        self.mounts
            .iter()
            .find(|m| starts_with_ignore_case(path, &m.prefix))
    }

    /// Route a request to its mount and produce the final response.
    pub async fn dispatch(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let Some(mount) = self.select(&path) else {
            tracing::debug!(method = %method, path = %path, "No mount matched");
            metrics::record_request(method.as_str(), StatusCode::NOT_FOUND.as_u16(), "none", start);
            return RouteError::NotFound.into_response();
        };

        let outcome = AssertUnwindSafe(mount.router.route(req, &mount.prefix))
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(
                    router = %mount.router.name(),
                    method = %method,
                    path = %path,
                    error = %format!("{:#}", e),
                    "Handler failed"
                );
                internal_error()
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(
                    router = %mount.router.name(),
                    method = %method,
                    path = %path,
                    panic = %message,
                    "Handler panicked"
                );
                internal_error()
            }
        };

        metrics::record_request(method.as_str(), response.status().as_u16(), &mount.prefix, start);
        response
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}

/// Collects mounts; consumed by `build()`.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    mounts: Vec<MountedRouter>,
}

impl DispatcherBuilder {
    /// Mount `router` under `prefix`. Mount order is match order.
    pub fn mount(mut self, prefix: &str, router: Router) -> Self {
        let prefix = normalize(prefix);
        tracing::info!(prefix = %prefix, router = %router.name(), "Router mounted");
        self.mounts.push(MountedRouter {
            prefix,
            router: Arc::new(router),
        });
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            mounts: self.mounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialVerifier;
    use crate::routing::handler::HandlerResult;
    use crate::routing::pattern::Params;
    use axum::http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DenyAll;

    impl CredentialVerifier for DenyAll {
        fn verify(&self, _token: &str) -> bool {
            false
        }

        fn subject_of(&self, _token: &str) -> Option<String> {
            None
        }
    }

    fn tagged(name: &'static str, hits: Arc<AtomicUsize>) -> Router {
        Router::builder(name, Arc::new(DenyAll))
            .pattern(
                Method::GET,
                "/{id}",
                move |_req: Request<Body>, params: Params| {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        let id = params.get("id").unwrap_or_default().to_string();
                        Ok::<_, anyhow::Error>(format!("{}:{}", name, id).into_response())
                    }
                },
                false,
            )
            .build()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_prefix_selects_single_router() {
        let users = Arc::new(AtomicUsize::new(0));
        let media = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .mount("/users", tagged("users", users.clone()))
            .mount("/media", tagged("media", media.clone()))
            .build();

        let response = dispatcher.dispatch(get("/media/9")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "media:9");
        assert_eq!(media.load(Ordering::SeqCst), 1);
        assert_eq!(users.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmounted_prefix_is_not_found() {
        let dispatcher = Dispatcher::builder()
            .mount("/users", tagged("users", Arc::new(AtomicUsize::new(0))))
            .build();

        let response = dispatcher.dispatch(get("/orders/1")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prefix_is_case_insensitive() {
        let dispatcher = Dispatcher::builder()
            .mount("users/", tagged("users", Arc::new(AtomicUsize::new(0))))
            .build();

        assert_eq!(dispatcher.mounts()[0].prefix(), "/users");
        let response = dispatcher.dispatch(get("/USERS/7")).await;
        assert_eq!(text(response).await, "users:7");
    }

    #[tokio::test]
    async fn test_handler_error_becomes_500() {
        async fn failing(_req: Request<Body>, _params: Params) -> HandlerResult {
            Err(anyhow::anyhow!("connection refused"))
        }

        let router = Router::builder("root", Arc::new(DenyAll))
            .route(Method::GET, "/fail", failing, false)
            .build();
        let dispatcher = Dispatcher::builder().mount("/", router).build();

        let response = dispatcher.dispatch(get("/fail")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text(response).await, INTERNAL_ERROR_BODY);
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_500() {
        async fn panicking(_req: Request<Body>, _params: Params) -> HandlerResult {
            panic!("handler bug")
        }

        let router = Router::builder("root", Arc::new(DenyAll))
            .route(Method::GET, "/panic", panicking, false)
            .build();
        let dispatcher = Dispatcher::builder().mount("/", router).build();

        let response = dispatcher.dispatch(get("/panic")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Later requests are unaffected.
        let response = dispatcher.dispatch(get("/panic/extra")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_no_cross_talk() {
        let dispatcher = Arc::new(
            Dispatcher::builder()
                .mount("/users", tagged("users", Arc::new(AtomicUsize::new(0))))
                .mount("/media", tagged("media", Arc::new(AtomicUsize::new(0))))
                .build(),
        );

        let mut tasks = Vec::new();
        for i in 0..64 {
            let dispatcher = Arc::clone(&dispatcher);
            tasks.push(tokio::spawn(async move {
                let mount = if i % 2 == 0 { "users" } else { "media" };
                let response = dispatcher.dispatch(get(&format!("/{}/{}", mount, i))).await;
                (format!("{}:{}", mount, i), text(response).await)
            }));
        }

        for task in tasks {
            let (expected, actual) = task.await.unwrap();
            assert_eq!(expected, actual);
        }
    }
}
