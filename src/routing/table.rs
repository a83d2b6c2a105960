//! Route storage and lookup.
//!
//! # Responsibilities
//! - Store exact routes and templated routes for one router
//! - Resolve a relative path + method to an endpoint
//!
//! # Design Decisions
//! - Built through [`RouteTableBuilder`], immutable after `build()`
//! - Exact paths are keyed case-insensitively and always win over templates
//! - Templates are scanned in registration order; first match wins
//! - A method miss on the resolved route is final (no fall-through)

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::error::RouteError;
use crate::routing::handler::{BoxedHandler, Handler};
use crate::routing::path::normalize;
use crate::routing::pattern::{Params, PathPattern};

/// A handler plus its authorization requirement.
#[derive(Clone)]
pub struct Endpoint {
    handler: BoxedHandler,
    requires_auth: bool,
}

impl Endpoint {
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("requires_auth", &self.requires_auth)
            .finish_non_exhaustive()
    }
}

/// Method → endpoint map, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct MethodMap {
    entries: Vec<(Method, Endpoint)>,
}

impl MethodMap {
    fn insert(&mut self, method: Method, endpoint: Endpoint) {
        match self.entries.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = endpoint,
            None => self.entries.push((method, endpoint)),
        }
    }

    pub fn get(&self, method: &Method) -> Option<&Endpoint> {
        self.entries.iter().find(|(m, _)| m == method).map(|(_, e)| e)
    }

    /// Registered methods, used for the `Allow` header.
    pub fn methods(&self) -> Vec<Method> {
        self.entries.iter().map(|(m, _)| m.clone()).collect()
    }

    fn select(&self, method: &Method) -> Result<&Endpoint, RouteError> {
        self.get(method).ok_or_else(|| RouteError::MethodNotAllowed {
            allow: self.methods(),
        })
    }
}

/// A resolved endpoint with the parameters extracted from the path.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub endpoint: &'a Endpoint,
    pub params: Params,
}

/// Frozen set of routes for one router.
#[derive(Debug, Default)]
pub struct RouteTable {
    exact: HashMap<String, MethodMap>,
    patterns: Vec<(PathPattern, MethodMap)>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Resolve a normalized relative path and method.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<Resolution<'_>, RouteError> {
        if let Some(methods) = self.exact.get(&path.to_ascii_lowercase()) {
            return Ok(Resolution {
                endpoint: methods.select(method)?,
                params: Params::new(),
            });
        }

        for (pattern, methods) in &self.patterns {
            if let Some(params) = pattern.extract(path) {
                return Ok(Resolution {
                    endpoint: methods.select(method)?,
                    params,
                });
            }
        }

        Err(RouteError::NotFound)
    }

    /// Number of distinct exact paths.
    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }

    /// Templates in resolution order.
    pub fn patterns(&self) -> impl Iterator<Item = &PathPattern> {
        self.patterns.iter().map(|(p, _)| p)
    }
}

/// Collects registrations; consumed by `build()`.
#[derive(Default)]
pub struct RouteTableBuilder {
    table: RouteTable,
}

impl RouteTableBuilder {
    /// Register an exact path. Re-registering a method replaces its handler.
    pub fn route<H: Handler>(
        mut self,
        method: Method,
        path: &str,
        handler: H,
        requires_auth: bool,
    ) -> Self {
        let key = normalize(path).to_ascii_lowercase();
        self.table
            .exact
            .entry(key)
            .or_default()
            .insert(method, endpoint(handler, requires_auth));
        self
    }

    /// Register a path template such as `/{id}/rate`.
    pub fn pattern<H: Handler>(
        mut self,
        method: Method,
        template: &str,
        handler: H,
        requires_auth: bool,
    ) -> Self {
        let template = normalize(template);
        let endpoint = endpoint(handler, requires_auth);

        let existing = self
            .table
            .patterns
            .iter_mut()
            .find(|(p, _)| p.template().eq_ignore_ascii_case(&template));
        match existing {
            Some((_, methods)) => methods.insert(method, endpoint),
            None => {
                let mut methods = MethodMap::default();
                methods.insert(method, endpoint);
                self.table.patterns.push((PathPattern::new(template), methods));
            }
        }
        self
    }

    pub fn build(self) -> RouteTable {
        self.table
    }
}

fn endpoint<H: Handler>(handler: H, requires_auth: bool) -> Endpoint {
    Endpoint {
        handler: Arc::new(handler),
        requires_auth,
    }
}
