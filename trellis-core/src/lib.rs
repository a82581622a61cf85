//! Declarative controllers for Trellis.
//!
//! Controllers declare routes, a route group and a RESTful resource through
//! [`Declarer`]. The [`RegistrationEngine`] stores those declarations per
//! controller type, resolves groups and resources, and submits the result to
//! any [`Router`]. [`boot`] ties it to controller discovery on disk.

pub mod config;
pub mod controller;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod group;
pub mod logging;
pub mod meta;
pub mod prelude;
pub mod resource;
pub mod router;
pub mod scanner;
pub mod table;

pub use config::{ConfigError, ConfigValue, FromConfigValue, ScanConfig, TrellisConfig};
pub use controller::{Controller, ControllerEntry, Declarer};
pub use declaration::{
    ActionFilter, ActionMiddleware, ActionSelector, Constraint, GroupDeclaration, HandlerRef,
    Matcher, Middleware, MiddlewareRef, ResourceDeclaration, RouteDeclaration, RouteDeclarations,
    Verb,
};
pub use engine::{boot, BootReport, Registration, RegistrationEngine};
pub use error::{DeclarationError, DiscoveryError, LoadError, RegistrationError, RouterError};
pub use group::{join_paths, GroupResolver, ResolvedRoute};
pub use logging::init_tracing;
pub use meta::{ControllerMetadata, MetadataStore};
pub use resource::{ResourceExpander, API_ACTIONS, RESOURCE_ACTIONS};
pub use router::{ResourceHandle, RouteHandle, Router};
pub use scanner::{
    Classifier, ControllerLoader, ControllerScanner, ScanFailure, ScanSummary, StaticLoader,
    CONTROLLER_SUFFIX,
};
pub use table::{CommittedRoute, RouteTable, TableResource, TableRoute};

pub use http::Method;
