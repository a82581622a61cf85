use std::collections::HashMap;
use std::sync::Arc;

use axum::handler::Handler;
use axum::routing::{on, MethodFilter, MethodRouter};

type MakeRoute<S> = Arc<dyn Fn(MethodFilter) -> MethodRouter<S> + Send + Sync>;
type WrapRoute<S> = Arc<dyn Fn(MethodRouter<S>) -> MethodRouter<S> + Send + Sync>;

/// Axum handlers keyed by handler reference (`Controller.method`).
pub struct HandlerRegistry<S> {
    handlers: HashMap<String, MakeRoute<S>>,
    duplicates: Vec<String>,
}

impl<S: Clone + Send + Sync + 'static> HandlerRegistry<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Register `handler` for the route whose handler reference is `handler_ref`,
    /// e.g. `"PostsController.index"`.
    ///
    /// Registering the same reference twice keeps the first handler and
    /// makes [`mount`](crate::mount) fail with `MountError::DuplicateHandler`.
    pub fn handler<H, T>(mut self, handler_ref: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let make: MakeRoute<S> = Arc::new(move |filter| on(filter, handler.clone()));
        if self.handlers.contains_key(handler_ref) {
            self.duplicates.push(handler_ref.to_string());
        } else {
            self.handlers.insert(handler_ref.to_string(), make);
        }
        self
    }

    pub(crate) fn method_router(&self, handler_ref: &str, filter: MethodFilter) -> Option<MethodRouter<S>> {
        self.handlers.get(handler_ref).map(|make| make(filter))
    }

    pub(crate) fn first_duplicate(&self) -> Option<&str> {
        self.duplicates.first().map(String::as_str)
    }
}

impl<S: Clone + Send + Sync + 'static> Default for HandlerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Named middleware, each a function wrapping a route's `MethodRouter`.
///
/// ```ignore
/// let middleware = MiddlewareRegistry::new()
///     .middleware("auth", |route| route.layer(axum::middleware::from_fn(require_token)));
/// ```
pub struct MiddlewareRegistry<S> {
    middleware: HashMap<String, WrapRoute<S>>,
}

impl<S: Clone + Send + Sync + 'static> MiddlewareRegistry<S> {
    pub fn new() -> Self {
        Self {
            middleware: HashMap::new(),
        }
    }

    pub fn middleware<F>(mut self, name: &str, wrap: F) -> Self
    where
        F: Fn(MethodRouter<S>) -> MethodRouter<S> + Send + Sync + 'static,
    {
        self.middleware.insert(name.to_string(), Arc::new(wrap));
        self
    }

    pub(crate) fn apply(&self, name: &str, route: MethodRouter<S>) -> Option<MethodRouter<S>> {
        self.middleware.get(name).map(|wrap| wrap(route))
    }
}

impl<S: Clone + Send + Sync + 'static> Default for MiddlewareRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
