pub use crate::config::{ScanConfig, TrellisConfig};
pub use crate::controller::{Controller, ControllerEntry, Declarer};
pub use crate::declaration::{
    ActionFilter, ActionSelector, GroupDeclaration, HandlerRef, Matcher, Middleware,
    MiddlewareRef, ResourceDeclaration, Verb,
};
pub use crate::engine::{boot, BootReport, Registration, RegistrationEngine};
pub use crate::router::{ResourceHandle, RouteHandle, Router};
pub use crate::scanner::{ControllerLoader, StaticLoader};
pub use crate::table::RouteTable;
