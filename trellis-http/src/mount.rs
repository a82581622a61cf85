use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{RawPathParams, Request};
use axum::middleware::{from_fn, Next};
use axum::response::IntoResponse;
use axum::routing::{MethodFilter, MethodRouter};
use http::{header, Method, StatusCode};
use regex::Regex;
use tracing::debug;
use trellis_core::{CommittedRoute, Constraint, RouteTable};

use crate::error::MountError;
use crate::registry::{HandlerRegistry, MiddlewareRegistry};

/// Build an axum router serving every route of `table`.
///
/// Route middleware is applied so that the first listed middleware runs
/// outermost. Constraint and domain checks run before any middleware and
/// answer `404 Not Found` when they do not hold.
///
/// # Errors
///
/// `MountError` when a handler is registered twice, a handler or
/// middleware is not registered, a
/// constraint pattern does not compile, or two routes answer the same
/// method on the same path.
pub fn mount<S>(
    table: &RouteTable,
    handlers: &HandlerRegistry<S>,
    middleware: &MiddlewareRegistry<S>,
) -> Result<axum::Router<S>, MountError>
where
    S: Clone + Send + Sync + 'static,
{
    if let Some(handler) = handlers.first_duplicate() {
        return Err(MountError::DuplicateHandler(handler.to_string()));
    }

    let mut router = axum::Router::new();
    let mut taken: HashSet<(String, Method)> = HashSet::new();

    for route in table.routes() {
        let path = axum_path(&route.pattern);
        for method in &route.methods {
            if !taken.insert((path.clone(), method.clone())) {
                return Err(MountError::Conflict {
                    path,
                    method: method.clone(),
                });
            }
        }
        let method_router = build_route(&route, handlers, middleware)?;
        debug!(
            path = %path,
            handler = %route.handler,
            name = route.name.as_deref().unwrap_or(""),
            "route mounted"
        );
        router = router.route(&path, method_router);
    }
    Ok(router)
}

fn build_route<S>(
    route: &CommittedRoute,
    handlers: &HandlerRegistry<S>,
    middleware: &MiddlewareRegistry<S>,
) -> Result<MethodRouter<S>, MountError>
where
    S: Clone + Send + Sync + 'static,
{
    let handler = route.handler.to_string();
    let filter = method_filter(&route.methods)?;
    let mut method_router = handlers
        .method_router(&handler, filter)
        .ok_or_else(|| MountError::MissingHandler(handler.clone()))?;

    for name in route.middleware.iter().rev() {
        method_router = middleware
            .apply(name.as_str(), method_router)
            .ok_or_else(|| MountError::UnknownMiddleware {
                route: handler.clone(),
                middleware: name.to_string(),
            })?;
    }

    if !route.constraints.is_empty() {
        method_router = with_constraints(method_router, &route.constraints)?;
    }
    if let Some(domain) = &route.domain {
        method_router = with_domain(method_router, domain);
    }
    Ok(method_router)
}

fn method_filter(methods: &[Method]) -> Result<MethodFilter, MountError> {
    let mut filters = methods.iter().map(|method| {
        MethodFilter::try_from(method.clone()).map_err(|_| MountError::UnsupportedMethod(method.clone()))
    });
    let first = filters
        .next()
        .unwrap_or(Err(MountError::UnsupportedMethod(Method::GET)))?;
    filters.try_fold(first, |acc, filter| Ok(acc.or(filter?)))
}

fn with_constraints<S>(route: MethodRouter<S>, constraints: &[Constraint]) -> Result<MethodRouter<S>, MountError>
where
    S: Clone + Send + Sync + 'static,
{
    let checks = constraints
        .iter()
        .map(|constraint| {
            let anchored = format!("^(?:{})$", constraint.matcher.regex());
            Regex::new(&anchored)
                .map(|regex| (constraint.key.clone(), regex))
                .map_err(|err| MountError::InvalidConstraint {
                    key: constraint.key.clone(),
                    message: err.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let checks = Arc::new(checks);

    Ok(route.layer(from_fn(move |params: RawPathParams, req: Request, next: Next| {
        let checks = checks.clone();
        async move {
            // A constraint on a parameter the path does not carry is ignored.
            let satisfied = checks.iter().all(|(key, regex)| {
                params
                    .iter()
                    .find(|(name, _)| *name == key.as_str())
                    .map_or(true, |(_, value)| regex.is_match(value))
            });
            if satisfied {
                next.run(req).await
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
    })))
}

fn with_domain<S>(route: MethodRouter<S>, domain: &str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let domain: Arc<str> = Arc::from(domain);
    route.layer(from_fn(move |req: Request, next: Next| {
        let domain = domain.clone();
        async move {
            if request_host(&req).is_some_and(|host| host.eq_ignore_ascii_case(&domain)) {
                next.run(req).await
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }))
}

/// Host of the request without its port, from `Host` or the request URI.
fn request_host(req: &Request) -> Option<&str> {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().host())?;
    Some(host.rsplit_once(':').map_or(host, |(name, _)| name))
}

/// Convert a route pattern to axum path syntax.
///
/// `:param` segments become `{param}` and a `*` segment becomes the
/// catch-all `{*wildcard}`. The result always starts with `/`.
pub fn axum_path(pattern: &str) -> String {
    let segments: Vec<String> = pattern
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if let Some(param) = segment.strip_prefix(':') {
                format!("{{{param}}}")
            } else if segment == "*" {
                "{*wildcard}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();
    let mut path = format!("/{}", segments.join("/"));
    if pattern.len() > 1 && pattern.ends_with('/') {
        path.push('/');
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_params_and_wildcards() {
        assert_eq!(axum_path("/posts/:id/edit"), "/posts/{id}/edit");
        assert_eq!(axum_path("/files/*"), "/files/{*wildcard}");
        assert_eq!(axum_path("dashboard"), "/dashboard");
        assert_eq!(axum_path("/"), "/");
        assert_eq!(axum_path("/admin/"), "/admin/");
    }

    #[test]
    fn method_filter_combines_verbs() {
        assert!(method_filter(&[Method::GET, Method::HEAD]).is_ok());
        assert!(matches!(method_filter(&[]), Err(MountError::UnsupportedMethod(_))));
    }
}
