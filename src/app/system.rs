//! Root-mounted operational routes.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;

use crate::auth::CredentialVerifier;
use crate::http::response;
use crate::routing::{HandlerResult, Params, Router};

/// `GET /health`, no auth.
pub fn router(verifier: Arc<dyn CredentialVerifier>) -> Router {
    Router::builder("system", verifier)
        .route(Method::GET, "/health", health, false)
        .build()
}

async fn health(_req: Request<Body>, _params: Params) -> HandlerResult {
    Ok(response::json(
        StatusCode::OK,
        json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
    ))
}
