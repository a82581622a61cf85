use std::collections::BTreeMap;
use std::fmt;

use http::Method;
use serde::Serialize;

/// HTTP verb of a route declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    /// Every standard method.
    Any,
}

impl Verb {
    /// The concrete methods a route registered with this verb answers to.
    ///
    /// `Get` also answers `HEAD`.
    pub fn methods(self) -> Vec<Method> {
        match self {
            Verb::Get => vec![Method::GET, Method::HEAD],
            Verb::Post => vec![Method::POST],
            Verb::Put => vec![Method::PUT],
            Verb::Patch => vec![Method::PATCH],
            Verb::Delete => vec![Method::DELETE],
            Verb::Options => vec![Method::OPTIONS],
            Verb::Head => vec![Method::HEAD],
            Verb::Any => vec![
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ],
        }
    }
}

/// Matcher for a `where` constraint on a path parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "pattern", rename_all = "lowercase")]
pub enum Matcher {
    Number,
    Uuid,
    Slug,
    /// A raw regular expression.
    Pattern(String),
}

impl Matcher {
    /// Anchored regular expression for this matcher.
    pub fn regex(&self) -> &str {
        match self {
            Matcher::Number => r"^\d+$",
            Matcher::Uuid => {
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
            }
            Matcher::Slug => r"^[a-z0-9]+(?:-[a-z0-9]+)*$",
            Matcher::Pattern(p) => p,
        }
    }
}

impl From<&str> for Matcher {
    fn from(pattern: &str) -> Self {
        Matcher::Pattern(pattern.to_string())
    }
}

/// A single `where` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub key: String,
    pub matcher: Matcher,
}

/// Reference to a named middleware, resolved by whatever router mounts the routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MiddlewareRef(String);

impl MiddlewareRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MiddlewareRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MiddlewareRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A middleware reference or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Middleware {
    One(MiddlewareRef),
    Many(Vec<MiddlewareRef>),
}

impl Middleware {
    /// Iterate the references in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, MiddlewareRef> {
        match self {
            Middleware::One(one) => std::slice::from_ref(one).iter(),
            Middleware::Many(many) => many.iter(),
        }
    }

    /// Flatten a list of ref-or-list values, preserving order.
    pub fn flatten<'a>(items: impl IntoIterator<Item = &'a Middleware>) -> Vec<MiddlewareRef> {
        items
            .into_iter()
            .flat_map(|item| item.iter().cloned())
            .collect()
    }
}

impl From<&str> for Middleware {
    fn from(name: &str) -> Self {
        Middleware::One(name.into())
    }
}

impl From<MiddlewareRef> for Middleware {
    fn from(one: MiddlewareRef) -> Self {
        Middleware::One(one)
    }
}

impl From<Vec<&str>> for Middleware {
    fn from(names: Vec<&str>) -> Self {
        Middleware::Many(names.into_iter().map(MiddlewareRef::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Middleware {
    fn from(names: [&str; N]) -> Self {
        Middleware::Many(names.into_iter().map(MiddlewareRef::from).collect())
    }
}

/// Identifies the controller method that handles a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HandlerRef {
    pub controller: String,
    pub method: String,
}

impl HandlerRef {
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.controller, self.method)
    }
}

/// Route declared on one controller method.
///
/// `verb` and `pattern` are optional because a constraint or middleware
/// declaration may target a method before its verb/pattern is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDeclaration {
    pub verb: Option<Verb>,
    pub pattern: Option<String>,
    pub name: Option<String>,
    pub constraints: Vec<Constraint>,
    pub middleware: Vec<Middleware>,
}

impl RouteDeclaration {
    /// Declaration with a verb and pattern and nothing else.
    pub fn new(verb: Verb, pattern: impl Into<String>) -> Self {
        Self {
            verb: Some(verb),
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Fill the scalar fields that are still absent. Present fields are kept.
    pub fn merge_primary(&mut self, verb: Option<Verb>, pattern: Option<&str>, name: Option<&str>) {
        if self.verb.is_none() {
            self.verb = verb;
        }
        if self.pattern.is_none() {
            self.pattern = pattern.map(str::to_string);
        }
        if self.name.is_none() {
            self.name = name.map(str::to_string);
        }
    }
}

/// Route declarations of one controller, keyed by method identifier, in
/// first-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDeclarations {
    entries: Vec<(String, RouteDeclaration)>,
}

impl RouteDeclarations {
    pub fn get(&self, method: &str) -> Option<&RouteDeclaration> {
        self.entries
            .iter()
            .find(|(id, _)| id == method)
            .map(|(_, decl)| decl)
    }

    /// The declaration for `method`, created empty if missing.
    pub fn entry(&mut self, method: &str) -> &mut RouteDeclaration {
        let index = match self.entries.iter().position(|(id, _)| id == method) {
            Some(index) => index,
            None => {
                self.entries.push((method.to_string(), RouteDeclaration::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteDeclaration)> {
        self.entries.iter().map(|(id, decl)| (id.as_str(), decl))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Controller-level group: shared name prefix, path prefix, domain and middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDeclaration {
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub domain: Option<String>,
    pub middleware: Option<Middleware>,
}

impl GroupDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn middleware(mut self, middleware: impl Into<Middleware>) -> Self {
        self.middleware = Some(middleware.into());
        self
    }
}

/// Restricts which of the canonical resource actions are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFilter {
    /// `index`, `store`, `show`, `update`, `destroy`.
    ApiOnly,
    Only(Vec<String>),
    Except(Vec<String>),
}

impl ActionFilter {
    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionFilter::ApiOnly => "api_only",
            ActionFilter::Only(_) => "only",
            ActionFilter::Except(_) => "except",
        }
    }
}

/// Selects the resource actions a middleware rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSelector {
    /// `*`: every generated action.
    All,
    One(String),
    Many(Vec<String>),
}

impl ActionSelector {
    pub fn matches(&self, action: &str) -> bool {
        match self {
            ActionSelector::All => true,
            ActionSelector::One(one) => one == action,
            ActionSelector::Many(many) => many.iter().any(|a| a == action),
        }
    }
}

impl From<&str> for ActionSelector {
    fn from(action: &str) -> Self {
        if action == "*" {
            ActionSelector::All
        } else {
            ActionSelector::One(action.to_string())
        }
    }
}

impl From<Vec<&str>> for ActionSelector {
    fn from(actions: Vec<&str>) -> Self {
        ActionSelector::Many(actions.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ActionSelector {
    fn from(actions: [&str; N]) -> Self {
        ActionSelector::Many(actions.into_iter().map(str::to_string).collect())
    }
}

/// One per-action middleware rule of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMiddleware {
    pub selector: ActionSelector,
    pub middleware: Middleware,
}

/// Controller-level RESTful resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDeclaration {
    pub base_pattern: String,
    /// Overrides the router's default resource name for every action.
    pub name: Option<String>,
    /// Segment name to parameter name.
    pub params: Option<BTreeMap<String, String>>,
    pub filter: Option<ActionFilter>,
    pub action_middleware: Vec<ActionMiddleware>,
}

impl ResourceDeclaration {
    pub fn new(base_pattern: impl Into<String>) -> Self {
        Self {
            base_pattern: base_pattern.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = Some(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn filter(mut self, filter: ActionFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn action_middleware(
        mut self,
        selector: impl Into<ActionSelector>,
        middleware: impl Into<Middleware>,
    ) -> Self {
        self.action_middleware.push(ActionMiddleware {
            selector: selector.into(),
            middleware: middleware.into(),
        });
        self
    }
}
