use serde::Serialize;

use crate::declaration::{Constraint, GroupDeclaration, Middleware, MiddlewareRef, RouteDeclaration, Verb};
use crate::error::DeclarationError;

/// Router-ready shape of one declared route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    /// Method identifier the route was declared on.
    pub method: String,
    pub verb: Verb,
    pub pattern: String,
    pub name: Option<String>,
    pub constraints: Vec<Constraint>,
    /// Group middleware first, then the route's own, each in declaration order.
    pub middleware: Vec<MiddlewareRef>,
    pub domain: Option<String>,
}

/// Merges a controller's group declaration into each of its routes.
///
/// Resolution only reads declarations; it never mutates what was stored.
#[derive(Debug, Clone, Copy)]
pub struct GroupResolver<'a> {
    controller: &'a str,
    group: Option<&'a GroupDeclaration>,
    group_middleware: &'a [Middleware],
}

impl<'a> GroupResolver<'a> {
    pub fn new(
        controller: &'a str,
        group: Option<&'a GroupDeclaration>,
        group_middleware: &'a [Middleware],
    ) -> Self {
        Self {
            controller,
            group,
            group_middleware,
        }
    }

    fn group_name(&self) -> Option<&'a str> {
        self.group.and_then(|g| g.name.as_deref())
    }

    fn prefix(&self) -> Option<&'a str> {
        self.group.and_then(|g| g.prefix.as_deref())
    }

    fn has_group_middleware(&self) -> bool {
        !self.group_middleware.is_empty() || self.group.is_some_and(|g| g.middleware.is_some())
    }

    /// Whether this resolver leaves pattern, name and middleware untouched.
    pub fn is_identity(&self) -> bool {
        self.group_name().is_none() && self.prefix().is_none() && !self.has_group_middleware()
    }

    /// Resolve the declaration stored for `method`.
    ///
    /// # Errors
    ///
    /// `DeclarationError::IncompleteRoute` if the declaration has no verb or pattern.
    pub fn resolve(&self, method: &str, decl: &RouteDeclaration) -> Result<ResolvedRoute, DeclarationError> {
        let (Some(verb), Some(pattern)) = (decl.verb, decl.pattern.as_deref()) else {
            return Err(DeclarationError::IncompleteRoute {
                controller: self.controller.to_string(),
                method: method.to_string(),
            });
        };
        let domain = self.group.and_then(|g| g.domain.clone());

        if self.is_identity() {
            return Ok(ResolvedRoute {
                method: method.to_string(),
                verb,
                pattern: pattern.to_string(),
                name: decl.name.clone(),
                constraints: decl.constraints.clone(),
                middleware: Middleware::flatten(&decl.middleware),
                domain,
            });
        }

        let pattern = match self.prefix() {
            Some(prefix) => join_paths(prefix, pattern),
            None => pattern.to_string(),
        };
        let name = match self.group_name() {
            Some(group) => Some(self.prefixed_name(group, decl.name.as_deref().unwrap_or(method))),
            None => decl.name.clone(),
        };

        let group_own = self.group.and_then(|g| g.middleware.as_ref());
        let middleware = Middleware::flatten(
            group_own
                .into_iter()
                .chain(self.group_middleware)
                .chain(&decl.middleware),
        );

        Ok(ResolvedRoute {
            method: method.to_string(),
            verb,
            pattern,
            name,
            constraints: decl.constraints.clone(),
            middleware,
            domain,
        })
    }

    /// `<group>.<name>`, unless `name` already carries the group prefix.
    pub fn prefixed_name(&self, group: &str, name: &str) -> String {
        match name.strip_prefix(group) {
            Some(rest) if rest.starts_with('.') => name.to_string(),
            _ => format!("{group}.{name}"),
        }
    }
}

/// Join a group prefix and a route pattern with exactly one `/`.
///
/// `"/admin"` + `"dashboard"` and `"admin/"` + `"/dashboard"` both give
/// `"/admin/dashboard"`; an empty or root pattern yields the prefix itself.
pub fn join_paths(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/').trim_start_matches('/');
    let pattern = pattern.trim_start_matches('/');
    match (prefix.is_empty(), pattern.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{pattern}"),
        (false, true) => format!("/{prefix}"),
        (false, false) => format!("/{prefix}/{pattern}"),
    }
}
