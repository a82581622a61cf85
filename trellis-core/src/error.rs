use std::fmt;
use std::path::PathBuf;

/// The controllers root could not be listed. Aborts boot.
#[derive(Debug)]
pub struct DiscoveryError {
    pub root: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot read controllers directory '{}': {}",
            self.root.display(),
            self.source
        )
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A controller candidate could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No controller is registered for the discovered file.
    NotRegistered(PathBuf),
    /// The loader failed for another reason.
    Failed { path: PathBuf, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotRegistered(path) => {
                write!(f, "no controller registered for '{}'", path.display())
            }
            LoadError::Failed { path, message } => {
                write!(f, "failed to load '{}': {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Returned by a [`Router`](crate::router::Router) primitive that rejects its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    InvalidResource { base: String, reason: String },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidResource { base, reason } => {
                write!(f, "invalid resource '{base}': {reason}")
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// A controller's declarations cannot be turned into routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// More than one of `api_only` / `only` / `except` on the same resource.
    ConflictingFilters {
        controller: String,
        existing: &'static str,
        attempted: &'static str,
    },
    /// A method has constraints or middleware but no verb/pattern.
    IncompleteRoute { controller: String, method: String },
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationError::ConflictingFilters {
                controller,
                existing,
                attempted,
            } => write!(
                f,
                "{controller}: resource already has a '{existing}' filter, cannot add '{attempted}'"
            ),
            DeclarationError::IncompleteRoute { controller, method } => {
                write!(f, "{controller}.{method}: route has no verb or pattern")
            }
        }
    }
}

impl std::error::Error for DeclarationError {}

/// Registration of one controller failed; it contributes no routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    Declaration(DeclarationError),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Declaration(err) => write!(f, "invalid declarations: {err}"),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Declaration(err) => Some(err),
        }
    }
}

impl From<DeclarationError> for RegistrationError {
    fn from(err: DeclarationError) -> Self {
        RegistrationError::Declaration(err)
    }
}
