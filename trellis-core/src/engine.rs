use std::any::TypeId;
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::controller::{Controller, ControllerEntry};
use crate::declaration::{GroupDeclaration, HandlerRef, Middleware, ResourceDeclaration, RouteDeclarations};
use crate::error::{DeclarationError, DiscoveryError, RegistrationError, RouterError};
use crate::group::{GroupResolver, ResolvedRoute};
use crate::meta::{keys, MetadataStore};
use crate::resource::ResourceExpander;
use crate::router::{RouteHandle, Router};
use crate::scanner::{ControllerLoader, ControllerScanner, ScanFailure};

/// What one controller contributed to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub controller: &'static str,
    /// Single routes submitted.
    pub routes: usize,
    /// `None` when the controller declares no resource.
    pub resource: Option<Result<(), RouterError>>,
}

/// Reads declarations from the metadata store and submits them to a router.
///
/// Owns the [`MetadataStore`]. Each controller's declaration pass runs at
/// most once, on its first registration.
#[derive(Debug, Default)]
pub struct RegistrationEngine {
    store: MetadataStore,
    declared: HashSet<TypeId>,
}

impl RegistrationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Run the declaration pass of `entry` unless it already ran.
    pub fn declare(&mut self, entry: &ControllerEntry) {
        if self.declared.insert(entry.type_id()) {
            entry.declare_into(&mut self.store);
        }
    }

    pub fn register_controller<C: Controller, R: Router>(&mut self, router: &mut R) -> Result<Registration, RegistrationError> {
        self.register(&ControllerEntry::of::<C>(), router)
    }

    /// Register every route and the resource declared by `entry`.
    ///
    /// Ordinary routes and the resource are independent: a resource the
    /// router rejects is logged and reported in [`Registration::resource`]
    /// while the ordinary routes stay registered.
    ///
    /// # Errors
    ///
    /// `RegistrationError::Declaration` when the declarations are
    /// contradictory or incomplete; nothing is submitted to the router then.
    pub fn register<R: Router>(&mut self, entry: &ControllerEntry, router: &mut R) -> Result<Registration, RegistrationError> {
        self.declare(entry);
        let target = entry.type_id();
        let controller = entry.name();

        if let Some(conflict) = self
            .store
            .get::<Vec<DeclarationError>>(target, keys::CONFLICTS)
            .and_then(|conflicts| conflicts.first())
        {
            return Err(conflict.clone().into());
        }

        let resolved = self.resolve_routes(entry)?;
        for route in &resolved {
            submit_route(controller, route, router);
        }

        let resource = self
            .store
            .get::<ResourceDeclaration>(target, keys::RESOURCE)
            .map(|decl| {
                ResourceExpander::expand(decl, controller, router).inspect_err(|err| {
                    error!(controller, error = %err, "resource registration failed");
                })
            });

        debug!(controller, routes = resolved.len(), resource = resource.is_some(), "controller registered");
        Ok(Registration {
            controller,
            routes: resolved.len(),
            resource,
        })
    }

    /// Resolve every stored route of `entry` through its group, in declaration order.
    pub fn resolve_routes(&self, entry: &ControllerEntry) -> Result<Vec<ResolvedRoute>, DeclarationError> {
        let target = entry.type_id();
        let Some(routes) = self.store.get::<RouteDeclarations>(target, keys::ROUTES) else {
            return Ok(Vec::new());
        };
        let group = self.store.get::<GroupDeclaration>(target, keys::GROUP);
        let group_middleware = self
            .store
            .get::<Vec<Middleware>>(target, keys::GROUP_MIDDLEWARE)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let resolver = GroupResolver::new(entry.name(), group, group_middleware);
        routes
            .iter()
            .map(|(method, decl)| resolver.resolve(method, decl))
            .collect()
    }
}

fn submit_route<R: Router>(controller: &str, route: &ResolvedRoute, router: &mut R) {
    let mut handle = router.route(
        &route.pattern,
        &route.verb.methods(),
        HandlerRef::new(controller, route.method.as_str()),
    );
    if let Some(name) = &route.name {
        handle.name(name);
    }
    for constraint in &route.constraints {
        handle.constraint(&constraint.key, &constraint.matcher);
    }
    for middleware in &route.middleware {
        handle.middleware(middleware);
    }
    if let Some(domain) = &route.domain {
        handle.domain(domain);
    }
    debug!(
        controller,
        method = %route.method,
        pattern = %route.pattern,
        name = route.name.as_deref().unwrap_or(""),
        "route registered"
    );
}

/// Outcome of [`boot`].
#[derive(Debug, Clone, Default)]
pub struct BootReport {
    /// Files classified as controllers, whether or not they registered.
    pub candidates: usize,
    pub registrations: Vec<Registration>,
    /// Controller files that contributed no routes.
    pub failures: Vec<ScanFailure>,
}

impl BootReport {
    /// Registrations whose resource the router rejected.
    pub fn resource_failures(&self) -> impl Iterator<Item = (&'static str, &RouterError)> {
        self.registrations.iter().filter_map(|reg| match &reg.resource {
            Some(Err(err)) => Some((reg.controller, err)),
            _ => None,
        })
    }
}

/// Discover controllers under `config.root` and register them with `router`.
///
/// # Errors
///
/// `DiscoveryError` if the controllers root cannot be read. Every other
/// failure is isolated to its controller and listed in the report.
pub async fn boot<L, R>(config: &ScanConfig, loader: &L, router: &mut R) -> Result<BootReport, DiscoveryError>
where
    L: ControllerLoader,
    R: Router + Send,
{
    let mut engine = RegistrationEngine::new();
    let mut registrations = Vec::new();
    let scanner = ControllerScanner::new(loader, config.classifier());

    let mut visit = |_: &Path, entry: ControllerEntry| -> Result<(), RegistrationError> {
        let registration = engine.register(&entry, router)?;
        registrations.push(registration);
        Ok(())
    };
    let summary = scanner.scan(&config.root, &mut visit).await?;

    let report = BootReport {
        candidates: summary.candidates,
        registrations,
        failures: summary.failures,
    };
    info!(
        root = %config.root.display(),
        candidates = report.candidates,
        controllers = report.registrations.len(),
        failed = report.failures.len(),
        "controllers registered"
    );
    Ok(report)
}
