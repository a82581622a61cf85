//! Contract with the router that owns the committed route table.
//!
//! Registration only ever goes through these primitives, so any router
//! (the in-memory [`RouteTable`](crate::table::RouteTable), or an adapter
//! over an HTTP framework) can sit behind the engine.

use std::collections::BTreeMap;

use http::Method;

use crate::declaration::{ActionSelector, HandlerRef, Matcher, MiddlewareRef};
use crate::error::RouterError;

pub trait Router {
    type Route<'a>: RouteHandle
    where
        Self: 'a;
    type Resource<'a>: ResourceHandle
    where
        Self: 'a;

    /// Register a single route.
    fn route(&mut self, pattern: &str, methods: &[Method], handler: HandlerRef) -> Self::Route<'_>;

    /// Register a resource expanding to the canonical RESTful actions,
    /// handled by `controller`.
    fn resource(&mut self, base_pattern: &str, controller: &str) -> Result<Self::Resource<'_>, RouterError>;
}

/// Configuration calls on a freshly registered route.
pub trait RouteHandle {
    /// Set the route name (`as`).
    fn name(&mut self, name: &str) -> &mut Self;
    /// Add a `where` constraint.
    fn constraint(&mut self, key: &str, matcher: &Matcher) -> &mut Self;
    /// Append a middleware (`use`).
    fn middleware(&mut self, middleware: &MiddlewareRef) -> &mut Self;
    fn domain(&mut self, domain: &str) -> &mut Self;
}

/// Configuration calls on a freshly registered resource.
pub trait ResourceHandle {
    /// Rename generated path parameters, keyed by resource segment.
    fn params(&mut self, params: &BTreeMap<String, String>) -> &mut Self;
    /// Append middleware to the selected actions, after any default middleware.
    fn middleware(&mut self, selector: &ActionSelector, middleware: &[MiddlewareRef]) -> &mut Self;
    fn api_only(&mut self) -> &mut Self;
    fn only(&mut self, actions: &[String]) -> &mut Self;
    fn except(&mut self, actions: &[String]) -> &mut Self;
    /// Replace the default resource name used for every action name (`as`).
    fn name(&mut self, name: &str) -> &mut Self;
}
