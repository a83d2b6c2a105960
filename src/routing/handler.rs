//! Handler capability invoked once a route is resolved and authorized.

use std::future::Future;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use futures_util::future::BoxFuture;

use crate::routing::pattern::Params;

/// Outcome of a handler. Errors surface as `500` at the dispatcher.
pub type HandlerResult = anyhow::Result<Response>;

/// Application logic bound to a route.
///
/// Exact matches receive an empty [`Params`]; pattern matches receive the
/// extracted placeholder values.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>, params: Params) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Body>, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: Request<Body>, params: Params) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(req, params))
    }
}

/// Shared, type-erased handler stored in route tables.
pub type BoxedHandler = Arc<dyn Handler>;

/// Bind shared state to an async function, producing a [`Handler`].
pub fn with_state<S, F, Fut>(state: Arc<S>, f: F) -> impl Handler
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request<Body>, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    move |req: Request<Body>, params: Params| f(Arc::clone(&state), req, params)
}
