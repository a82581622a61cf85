//! Mounts a committed Trellis [`RouteTable`](trellis_core::RouteTable) onto axum.

mod error;
mod mount;
mod registry;

pub use error::MountError;
pub use mount::{axum_path, mount};
pub use registry::{HandlerRegistry, MiddlewareRegistry};
