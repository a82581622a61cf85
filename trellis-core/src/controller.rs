use std::any::{type_name, TypeId};
use std::collections::BTreeMap;

use crate::declaration::{
    ActionFilter, ActionMiddleware, ActionSelector, Constraint, GroupDeclaration, Matcher,
    Middleware, ResourceDeclaration, RouteDeclaration, RouteDeclarations, Verb,
};
use crate::error::DeclarationError;
use crate::meta::{keys, MetadataStore};

/// A type grouping related route-handling methods.
///
/// `declare` is the static declaration pass. It runs once per controller
/// type, when the type is first registered.
///
/// ```ignore
/// struct PostsController;
///
/// impl Controller for PostsController {
///     fn declare(d: &mut Declarer<'_>) {
///         d.group(GroupDeclaration::new().name("posts").prefix("/posts"))
///             .get("index", "/")
///             .post("store", "/")
///             .middleware("store", "auth");
///     }
/// }
/// ```
pub trait Controller: 'static {
    /// Controller name used in handler references and diagnostics.
    ///
    /// Handler references are `<name>.<method>`, so names must be unique
    /// across the application. The default is the bare type name; override
    /// it when two controllers in different modules share one.
    fn name() -> &'static str {
        short_type_name::<Self>()
    }

    fn declare(d: &mut Declarer<'_>);
}

/// Last path segment of a type name (`app::controllers::PostsController` -> `PostsController`).
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// A controller type erased to what the registration engine needs.
#[derive(Clone, Copy)]
pub struct ControllerEntry {
    type_id: TypeId,
    name: &'static str,
    declare: fn(&mut Declarer<'_>),
}

impl ControllerEntry {
    pub fn of<C: Controller>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::name(),
            declare: C::declare,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the declaration pass against `store`.
    pub(crate) fn declare_into(&self, store: &mut MetadataStore) {
        let mut declarer = Declarer {
            store,
            target: self.type_id,
            controller: self.name,
        };
        (self.declare)(&mut declarer);
    }
}

impl std::fmt::Debug for ControllerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Declaration surface handed to [`Controller::declare`].
///
/// Route writes follow "existing field wins": once a method has a verb,
/// pattern or name, later writes only fill what is still absent.
/// Constraints and middleware always append. Group and resource scalar
/// fields are last-write-wins.
pub struct Declarer<'s> {
    store: &'s mut MetadataStore,
    target: TypeId,
    controller: &'static str,
}

impl<'s> Declarer<'s> {
    /// Declarer writing into `store` on behalf of controller `C`.
    pub fn for_controller<C: Controller>(store: &'s mut MetadataStore) -> Self {
        Self {
            store,
            target: TypeId::of::<C>(),
            controller: C::name(),
        }
    }

    pub fn controller(&self) -> &'static str {
        self.controller
    }

    // ── Routes ──────────────────────────────────────────────────────────

    pub fn route(&mut self, method: &str, verb: Verb, pattern: &str) -> &mut Self {
        self.update_routes(method, |decl| decl.merge_primary(Some(verb), Some(pattern), None))
    }

    pub fn route_named(&mut self, method: &str, verb: Verb, pattern: &str, name: &str) -> &mut Self {
        self.update_routes(method, |decl| {
            decl.merge_primary(Some(verb), Some(pattern), Some(name))
        })
    }

    pub fn get(&mut self, method: &str, pattern: &str) -> &mut Self {
        self.route(method, Verb::Get, pattern)
    }

    pub fn post(&mut self, method: &str, pattern: &str) -> &mut Self {
        self.route(method, Verb::Post, pattern)
    }

    pub fn put(&mut self, method: &str, pattern: &str) -> &mut Self {
        self.route(method, Verb::Put, pattern)
    }

    pub fn patch(&mut self, method: &str, pattern: &str) -> &mut Self {
        self.route(method, Verb::Patch, pattern)
    }

    pub fn delete(&mut self, method: &str, pattern: &str) -> &mut Self {
        self.route(method, Verb::Delete, pattern)
    }

    pub fn any(&mut self, method: &str, pattern: &str) -> &mut Self {
        self.route(method, Verb::Any, pattern)
    }

    /// Name the route of `method`, unless it already has one.
    pub fn name(&mut self, method: &str, name: &str) -> &mut Self {
        self.update_routes(method, |decl| decl.merge_primary(None, None, Some(name)))
    }

    pub fn constraint(&mut self, method: &str, key: &str, matcher: impl Into<Matcher>) -> &mut Self {
        let constraint = Constraint {
            key: key.to_string(),
            matcher: matcher.into(),
        };
        self.update_routes(method, |decl| decl.constraints.push(constraint))
    }

    pub fn middleware(&mut self, method: &str, middleware: impl Into<Middleware>) -> &mut Self {
        let middleware = middleware.into();
        self.update_routes(method, |decl| decl.middleware.push(middleware))
    }

    // ── Group ───────────────────────────────────────────────────────────

    pub fn group(&mut self, group: GroupDeclaration) -> &mut Self {
        self.store.set(self.target, keys::GROUP, group);
        self
    }

    /// Middleware applied before every route of the controller, after the
    /// group's own middleware.
    pub fn group_middleware(&mut self, middleware: impl Into<Middleware>) -> &mut Self {
        self.store
            .append(self.target, keys::GROUP_MIDDLEWARE, middleware.into());
        self
    }

    // ── Resource ────────────────────────────────────────────────────────

    pub fn resource(&mut self, base_pattern: &str) -> &mut Self {
        let base_pattern = base_pattern.to_string();
        self.update_resource(|res| res.base_pattern = base_pattern)
    }

    pub fn resource_name(&mut self, name: &str) -> &mut Self {
        let name = name.to_string();
        self.update_resource(|res| res.name = Some(name))
    }

    pub fn resource_params<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.update_resource(|res| res.params = Some(params))
    }

    pub fn api_only(&mut self) -> &mut Self {
        self.set_filter(ActionFilter::ApiOnly)
    }

    pub fn only<I, A>(&mut self, actions: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.set_filter(ActionFilter::Only(actions.into_iter().map(Into::into).collect()))
    }

    pub fn except<I, A>(&mut self, actions: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.set_filter(ActionFilter::Except(actions.into_iter().map(Into::into).collect()))
    }

    pub fn resource_middleware(
        &mut self,
        selector: impl Into<ActionSelector>,
        middleware: impl Into<Middleware>,
    ) -> &mut Self {
        let rule = ActionMiddleware {
            selector: selector.into(),
            middleware: middleware.into(),
        };
        self.update_resource(|res| res.action_middleware.push(rule))
    }

    /// A resource takes exactly one filter; a second one is recorded as a
    /// conflict and fails the controller's registration.
    fn set_filter(&mut self, filter: ActionFilter) -> &mut Self {
        let existing = self
            .store
            .get::<ResourceDeclaration>(self.target, keys::RESOURCE)
            .and_then(|res| res.filter.as_ref())
            .map(ActionFilter::kind);
        if let Some(existing) = existing {
            let conflict = DeclarationError::ConflictingFilters {
                controller: self.controller.to_string(),
                existing,
                attempted: filter.kind(),
            };
            self.store.append(self.target, keys::CONFLICTS, conflict);
            return self;
        }
        self.update_resource(|res| res.filter = Some(filter))
    }

    fn update_routes(&mut self, method: &str, f: impl FnOnce(&mut RouteDeclaration)) -> &mut Self {
        let mut routes = self
            .store
            .get::<RouteDeclarations>(self.target, keys::ROUTES)
            .cloned()
            .unwrap_or_default();
        f(routes.entry(method));
        self.store.set(self.target, keys::ROUTES, routes);
        self
    }

    fn update_resource(&mut self, f: impl FnOnce(&mut ResourceDeclaration)) -> &mut Self {
        let mut resource = self
            .store
            .get::<ResourceDeclaration>(self.target, keys::RESOURCE)
            .cloned()
            .unwrap_or_default();
        f(&mut resource);
        self.store.set(self.target, keys::RESOURCE, resource);
        self
    }
}
