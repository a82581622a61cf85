use std::path::PathBuf;

use regex::Regex;

use super::{ConfigError, TrellisConfig};
use crate::scanner::Classifier;

/// Where controllers live and how controller files are recognised.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    /// Overrides the default `_controller.rs` suffix rule when set.
    pub pattern: Option<Regex>,
}

impl ScanConfig {
    pub const ROOT_KEY: &'static str = "trellis.controllers.root";
    pub const PATTERN_KEY: &'static str = "trellis.controllers.pattern";
    pub const DEFAULT_ROOT: &'static str = "src/controllers";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Read the `trellis.controllers` section.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the pattern is not a valid regular expression.
    pub fn from_config(config: &TrellisConfig) -> Result<Self, ConfigError> {
        let root = config
            .get_opt::<PathBuf>(Self::ROOT_KEY)?
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_ROOT));
        let pattern = match config.get_opt::<String>(Self::PATTERN_KEY)? {
            Some(source) => Some(Regex::new(&source).map_err(|e| ConfigError::Invalid {
                key: Self::PATTERN_KEY.to_string(),
                message: e.to_string(),
            })?),
            None => None,
        };
        Ok(Self { root, pattern })
    }

    pub fn classifier(&self) -> Classifier {
        match &self.pattern {
            Some(pattern) => Classifier::Pattern(pattern.clone()),
            None => Classifier::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}
