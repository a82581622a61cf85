//! Demo service wiring Trellis controllers onto axum.

pub mod controllers;
pub mod middleware;
pub mod state;

use std::error::Error;

use axum::middleware::from_fn;
use trellis::prelude::*;

use controllers::admin::users_controller::{self, UsersController};
use controllers::health_controller::{self, HealthController};
use controllers::posts_controller::{self, PostsController};
use state::AppState;

/// Controller files known to this binary, keyed by their path under the controllers root.
pub fn loader() -> StaticLoader {
    StaticLoader::new()
        .with::<HealthController>("health_controller.rs")
        .with::<PostsController>("posts_controller.rs")
        .with::<UsersController>("admin/users_controller.rs")
}

pub fn handlers() -> HandlerRegistry<AppState> {
    HandlerRegistry::new()
        .handler("HealthController.check", health_controller::check)
        .handler("PostsController.index", posts_controller::index)
        .handler("PostsController.store", posts_controller::store)
        .handler("PostsController.show", posts_controller::show)
        .handler("PostsController.update", posts_controller::update)
        .handler("PostsController.destroy", posts_controller::destroy)
        .handler("UsersController.index", users_controller::index)
        .handler("UsersController.show", users_controller::show)
}

pub fn middleware() -> MiddlewareRegistry<AppState> {
    MiddlewareRegistry::new().middleware("auth", |route| route.layer(from_fn(middleware::require_token)))
}

/// Discover controllers, register them and mount the resulting route table.
pub async fn build_router(config: &TrellisConfig, state: AppState) -> Result<axum::Router, Box<dyn Error + Send + Sync>> {
    let scan = ScanConfig::from_config(config)?;
    let mut table = RouteTable::new();
    let report = boot(&scan, &loader(), &mut table).await?;
    for failure in &report.failures {
        tracing::warn!(path = %failure.path.display(), error = %failure.message, "controller not registered");
    }
    for (controller, err) in report.resource_failures() {
        tracing::warn!(controller, error = %err, "resource not registered");
    }

    let router = mount(&table, &handlers(), &middleware())?;
    Ok(router.with_state(state))
}
