//! Per-mount request router.
//!
//! # Responsibilities
//! - Strip the mount prefix to get the relative path
//! - Resolve against the route table (exact, then pattern)
//! - Enforce the bearer-token gate on protected endpoints
//! - Invoke the handler with extracted parameters
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - The credential verifier is injected, not inherited
//! - 404/405/401 are answered here; handler errors bubble up

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request},
    response::IntoResponse,
};

use crate::auth::{bearer_token, CredentialVerifier};
use crate::observability::metrics;
use crate::routing::error::RouteError;
use crate::routing::handler::{Handler, HandlerResult};
use crate::routing::path::relative;
use crate::routing::table::{Resolution, RouteTable, RouteTableBuilder};

/// A named set of routes sharing one credential verifier.
pub struct Router {
    name: String,
    table: RouteTable,
    verifier: Arc<dyn CredentialVerifier>,
}

impl Router {
    pub fn builder(
        name: impl Into<String>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> RouterBuilder {
        RouterBuilder {
            name: name.into(),
            table: RouteTable::builder(),
            verifier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Run steps up to (not including) handler invocation.
    pub fn resolve(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        base_path: &str,
    ) -> Result<Resolution<'_>, RouteError> {
        let relative_path = relative(path, base_path).ok_or(RouteError::NotFound)?;
        let resolution = self.table.resolve(method, &relative_path)?;

        if resolution.endpoint.requires_auth() && !self.authorize(headers) {
            metrics::record_auth_rejection(&self.name);
            return Err(RouteError::Unauthorized);
        }

        Ok(resolution)
    }

    fn authorize(&self, headers: &HeaderMap) -> bool {
        bearer_token(headers)
            .map(|token| self.verifier.verify(token))
            .unwrap_or(false)
    }

    /// Route a request mounted at `base_path`.
    pub async fn route(&self, req: Request<Body>, base_path: &str) -> HandlerResult {
        let resolved = self.resolve(req.method(), req.uri().path(), req.headers(), base_path);

        match resolved {
            Ok(Resolution { endpoint, params }) => {
                tracing::trace!(router = %self.name, params = params.len(), "Route resolved");
                endpoint.handler().call(req, params).await
            }
            Err(e) => {
                tracing::debug!(
                    router = %self.name,
                    method = %req.method(),
                    path = %req.uri().path(),
                    outcome = %e,
                    "Route rejected"
                );
                Ok(e.into_response())
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("name", &self.name)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Registration surface; the only way to add routes.
pub struct RouterBuilder {
    name: String,
    table: RouteTableBuilder,
    verifier: Arc<dyn CredentialVerifier>,
}

impl RouterBuilder {
    pub fn route<H: Handler>(
        mut self,
        method: Method,
        path: &str,
        handler: H,
        requires_auth: bool,
    ) -> Self {
        self.table = self.table.route(method, path, handler, requires_auth);
        self
    }

    pub fn pattern<H: Handler>(
        mut self,
        method: Method,
        template: &str,
        handler: H,
        requires_auth: bool,
    ) -> Self {
        self.table = self.table.pattern(method, template, handler, requires_auth);
        self
    }

    pub fn build(self) -> Router {
        let table = self.table.build();
        tracing::debug!(
            router = %self.name,
            exact_routes = table.exact_len(),
            pattern_routes = table.patterns().count(),
            "Router built"
        );
        Router {
            name: self.name,
            table,
            verifier: self.verifier,
        }
    }
}
