use std::fmt;

use http::Method;

/// The route table cannot be mounted onto axum.
#[derive(Debug)]
pub enum MountError {
    /// No handler registered for a route's handler reference.
    MissingHandler(String),
    /// The same handler reference was registered more than once.
    DuplicateHandler(String),
    UnknownMiddleware { route: String, middleware: String },
    InvalidConstraint { key: String, message: String },
    /// Two routes answer the same method on the same path.
    Conflict { path: String, method: Method },
    UnsupportedMethod(Method),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::MissingHandler(handler) => write!(f, "no handler registered for {handler}"),
            MountError::DuplicateHandler(handler) => {
                write!(f, "handler {handler} is registered more than once")
            }
            MountError::UnknownMiddleware { route, middleware } => {
                write!(f, "route {route} uses unknown middleware '{middleware}'")
            }
            MountError::InvalidConstraint { key, message } => {
                write!(f, "invalid constraint on '{key}': {message}")
            }
            MountError::Conflict { path, method } => {
                write!(f, "{method} {path} is registered more than once")
            }
            MountError::UnsupportedMethod(method) => write!(f, "unsupported method {method}"),
        }
    }
}

impl std::error::Error for MountError {}
