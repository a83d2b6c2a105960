//! Request body helpers for handlers.
//!
//! # Responsibilities
//! - Read the request body with a size limit
//! - Deserialize JSON bodies
//!
//! # Design Decisions
//! - Bodies are read by handlers, never by the router
//! - Size limit enforced while reading, before buffering the full body
//! - Malformed JSON is a client error, not a handler fault

use axum::{
    body::{Body, Bytes},
    http::Request,
};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Name of the correlation header set on every request.
pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body could not be read: {0}")]
    Read(#[from] axum::Error),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Buffer the body, failing once it exceeds `limit` bytes.
pub async fn read_body(req: Request<Body>, limit: usize) -> Result<Bytes, BodyError> {
    let mut stream = req.into_body().into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}

/// Buffer and deserialize a JSON body.
pub async fn read_json<T: DeserializeOwned>(
    req: Request<Body>,
    limit: usize,
) -> Result<T, BodyError> {
    let bytes = read_body(req, limit).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// The request id assigned by the HTTP layer, if any.
pub fn request_id(req: &Request<Body>) -> Option<&str> {
    req.headers().get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}
