//! Trellis: declarative controllers, route groups and RESTful resources.
//!
//! This facade crate re-exports the Trellis sub-crates through a single
//! dependency. Import everything you need with:
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature | Default | Crate          |
//! |---------|---------|----------------|
//! | `http`  | **yes** | `trellis-http` |

pub extern crate trellis_core;

#[cfg(feature = "http")]
pub extern crate trellis_http;

pub use trellis_core::*;

#[cfg(feature = "http")]
pub use trellis_http::{axum_path, mount, HandlerRegistry, MiddlewareRegistry, MountError};

pub mod prelude {
    pub use trellis_core::prelude::*;
    pub use trellis_core::{init_tracing, Method};

    #[cfg(feature = "http")]
    pub use trellis_http::{mount, HandlerRegistry, MiddlewareRegistry};
}
