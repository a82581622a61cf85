use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use regex::Regex;
use tracing::{debug, error, warn};

use crate::controller::{Controller, ControllerEntry};
use crate::error::{DiscoveryError, LoadError, RegistrationError};

/// Default file-name suffix of a controller file.
pub const CONTROLLER_SUFFIX: &str = "_controller.rs";

/// Decides whether a file name designates a controller.
#[derive(Debug, Clone)]
pub enum Classifier {
    Suffix(String),
    /// Override pattern tested against the file name.
    Pattern(Regex),
}

impl Classifier {
    pub fn is_controller(&self, file_name: &str) -> bool {
        match self {
            Classifier::Suffix(suffix) => file_name.ends_with(suffix.as_str()),
            Classifier::Pattern(pattern) => pattern.is_match(file_name),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::Suffix(CONTROLLER_SUFFIX.to_string())
    }
}

/// Turns a discovered controller file into a controller.
pub trait ControllerLoader: Send + Sync {
    fn load<'a>(&'a self, path: &'a Path) -> impl Future<Output = Result<ControllerEntry, LoadError>> + Send + 'a;
}

/// Host-assembled registry of `(descriptor, controller)` pairs.
///
/// A descriptor is a path relative to the controllers root, such as
/// `admin/posts_controller.rs`; it matches any discovered file whose path
/// ends with the same components.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    entries: Vec<(PathBuf, ControllerEntry)>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C: Controller>(mut self, descriptor: impl Into<PathBuf>) -> Self {
        self.register::<C>(descriptor);
        self
    }

    pub fn register<C: Controller>(&mut self, descriptor: impl Into<PathBuf>) -> &mut Self {
        self.entries.push((descriptor.into(), ControllerEntry::of::<C>()));
        self
    }

    fn lookup(&self, path: &Path) -> Result<ControllerEntry, LoadError> {
        self.entries
            .iter()
            .find(|(descriptor, _)| path.ends_with(descriptor))
            .map(|(_, entry)| *entry)
            .ok_or_else(|| LoadError::NotRegistered(path.to_path_buf()))
    }
}

impl ControllerLoader for StaticLoader {
    fn load<'a>(&'a self, path: &'a Path) -> impl Future<Output = Result<ControllerEntry, LoadError>> + Send + 'a {
        std::future::ready(self.lookup(path))
    }
}

/// A controller file that contributed no routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files classified as controllers.
    pub candidates: usize,
    pub failures: Vec<ScanFailure>,
}

type WalkFuture<'s> = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send + 's>>;

/// Walks the controllers directory, loading and handing over each controller.
pub struct ControllerScanner<'l, L> {
    loader: &'l L,
    classifier: Classifier,
}

impl<'l, L: ControllerLoader> ControllerScanner<'l, L> {
    pub fn new(loader: &'l L, classifier: Classifier) -> Self {
        Self { loader, classifier }
    }

    /// Scan `root` recursively and pass every loaded controller to `visit`.
    ///
    /// Each load and visit completes before the next entry is looked at.
    /// Subdirectories are descended into as they are listed; symbolic links
    /// to directories are not. A file that
    /// fails to load or register is logged and skipped; an unreadable
    /// subdirectory is logged and skipped.
    ///
    /// # Errors
    ///
    /// `DiscoveryError` if `root` itself cannot be listed.
    pub async fn scan<F>(&self, root: &Path, visit: &mut F) -> Result<ScanSummary, DiscoveryError>
    where
        F: FnMut(&Path, ControllerEntry) -> Result<(), RegistrationError> + Send,
    {
        let mut summary = ScanSummary::default();
        let entries = tokio::fs::read_dir(root).await.map_err(|source| DiscoveryError {
            root: root.to_path_buf(),
            source,
        })?;
        if let Err(err) = self.walk_entries(entries, visit, &mut summary).await {
            return Err(DiscoveryError {
                root: root.to_path_buf(),
                source: err,
            });
        }
        Ok(summary)
    }

    fn walk<'s, F>(&'s self, dir: PathBuf, visit: &'s mut F, summary: &'s mut ScanSummary) -> WalkFuture<'s>
    where
        F: FnMut(&Path, ControllerEntry) -> Result<(), RegistrationError> + Send,
    {
        Box::pin(async move {
            let entries = tokio::fs::read_dir(&dir).await?;
            self.walk_entries(entries, visit, summary).await
        })
    }

    async fn walk_entries<F>(
        &self,
        mut entries: tokio::fs::ReadDir,
        visit: &mut F,
        summary: &mut ScanSummary,
    ) -> std::io::Result<()>
    where
        F: FnMut(&Path, ControllerEntry) -> Result<(), RegistrationError> + Send,
    {
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            // The entry's own type: symlinked directories are not followed.
            let is_dir = match entry.file_type().await {
                Ok(file_type) => file_type.is_dir(),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if is_dir {
                if let Err(err) = self.walk(path.clone(), visit, summary).await {
                    error!(path = %path.display(), error = %err, "cannot read controllers subdirectory");
                }
                continue;
            }

            let file_name = entry.file_name();
            if !self.classifier.is_controller(&file_name.to_string_lossy()) {
                continue;
            }
            summary.candidates += 1;
            self.load_one(&path, visit, summary).await;
        }
        Ok(())
    }

    async fn load_one<F>(&self, path: &Path, visit: &mut F, summary: &mut ScanSummary)
    where
        F: FnMut(&Path, ControllerEntry) -> Result<(), RegistrationError> + Send,
    {
        let outcome = match self.loader.load(path).await {
            Ok(controller) => {
                debug!(path = %path.display(), controller = controller.name(), "controller loaded");
                visit(path, controller).map_err(|err| err.to_string())
            }
            Err(err) => Err(err.to_string()),
        };
        if let Err(message) = outcome {
            error!(path = %path.display(), error = %message, "controller skipped");
            summary.failures.push(ScanFailure {
                path: path.to_path_buf(),
                message,
            });
        }
    }
}
