// src/config.rs

//! Conversion configuration
//!
//! A batch is described by an immutable [`ConversionRequest`]. Requests are
//! built in code or from [`Settings`], the TOML configuration file schema.
//!
//! # Example native2ascii.toml
//!
//! ```toml
//! src_dir = "src/main/native2ascii"
//! target_dir = "target/classes"
//! encoding = "UTF-8"
//! includes = ["**/*.properties"]
//! excludes = ["**/draft/**"]
//! jobs = 4
//! continue_on_error = false
//! ```
//!
//! Relative directories in a file are resolved against the directory that
//! contains the file.

use crate::error::{Error, Result};
use crate::filesystem::DEFAULT_INCLUDES;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default source root
pub const DEFAULT_SRC_DIR: &str = "src/main/native2ascii";

/// Default target root
pub const DEFAULT_TARGET_DIR: &str = "target/classes";

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "native2ascii.toml";

/// Which way files are converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Native encoding to escaped ASCII
    #[default]
    Native2Ascii,
    /// Escaped ASCII back to the native encoding
    Ascii2Native,
}

/// What to do when a single file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the batch on the first failure
    #[default]
    FailFast,
    /// Convert every file, then report all failures
    ContinueOnError,
}

/// Immutable description of one conversion batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source_dir: PathBuf,
    target_dir: PathBuf,
    encoding: Option<String>,
    includes: Vec<String>,
    excludes: Vec<String>,
    direction: Direction,
    use_default_excludes: bool,
    jobs: usize,
    failure_policy: FailurePolicy,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self::new(DEFAULT_SRC_DIR, DEFAULT_TARGET_DIR)
    }
}

impl ConversionRequest {
    /// Create a request with default patterns and options
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            encoding: None,
            includes: DEFAULT_INCLUDES.iter().map(|s| s.to_string()).collect(),
            excludes: Vec::new(),
            direction: Direction::default(),
            use_default_excludes: true,
            jobs: 0,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Set the source encoding; blank means the platform default
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Replace the include patterns; an empty list selects the defaults
    pub fn with_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the exclude patterns
    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the conversion direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Toggle the built-in VCS and editor excludes
    pub fn with_default_excludes(mut self, enabled: bool) -> Self {
        self.use_default_excludes = enabled;
        self
    }

    /// Number of worker threads, 0 for one per CPU
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set how a failing file affects the batch
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Directory scanned for resources
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Directory converted files are written to
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Configured encoding, `None` when unset or blank
    pub fn encoding(&self) -> Option<&str> {
        self.encoding
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Include patterns as given
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Exclude patterns as given
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Conversion direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the built-in excludes apply
    pub fn use_default_excludes(&self) -> bool {
        self.use_default_excludes
    }

    /// Worker thread count, 0 for one per CPU
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Failure handling for the batch
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Reject requests that cannot be run
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(Error::Config("source directory is empty".to_string()));
        }
        if self.target_dir.as_os_str().is_empty() {
            return Err(Error::Config("target directory is empty".to_string()));
        }
        Ok(())
    }
}

/// Settings read from a configuration file or command line
///
/// Every field is optional so that layers can be merged; unset fields fall
/// back to the defaults of [`ConversionRequest::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub src_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub encoding: Option<String>,
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub reverse: Option<bool>,
    pub jobs: Option<usize>,
    pub continue_on_error: Option<bool>,
    pub default_excludes: Option<bool>,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a file, resolving directories against its location
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::from_io(e, path))?;
        let settings = Self::from_toml(&text)?;
        match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => Ok(settings.resolve_against(base)),
            _ => Ok(settings),
        }
    }

    /// Load [`DEFAULT_CONFIG_FILE`] from `dir` when it exists
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn resolve_against(mut self, base: &Path) -> Self {
        self.src_dir = self.src_dir.map(|p| base.join(p));
        self.target_dir = self.target_dir.map(|p| base.join(p));
        self
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            src_dir: overrides.src_dir.or(self.src_dir),
            target_dir: overrides.target_dir.or(self.target_dir),
            encoding: overrides.encoding.or(self.encoding),
            includes: overrides.includes.or(self.includes),
            excludes: overrides.excludes.or(self.excludes),
            reverse: overrides.reverse.or(self.reverse),
            jobs: overrides.jobs.or(self.jobs),
            continue_on_error: overrides.continue_on_error.or(self.continue_on_error),
            default_excludes: overrides.default_excludes.or(self.default_excludes),
        }
    }

    /// Build the request these settings describe
    pub fn into_request(self) -> ConversionRequest {
        let mut request = ConversionRequest::new(
            self.src_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SRC_DIR)),
            self.target_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)),
        );
        if let Some(encoding) = self.encoding {
            request = request.with_encoding(encoding);
        }
        if let Some(includes) = self.includes {
            request = request.with_includes(includes);
        }
        if let Some(excludes) = self.excludes {
            request = request.with_excludes(excludes);
        }
        if self.reverse == Some(true) {
            request = request.with_direction(Direction::Ascii2Native);
        }
        if let Some(jobs) = self.jobs {
            request = request.with_jobs(jobs);
        }
        if self.continue_on_error == Some(true) {
            request = request.with_failure_policy(FailurePolicy::ContinueOnError);
        }
        if let Some(enabled) = self.default_excludes {
            request = request.with_default_excludes(enabled);
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_request_defaults() {
        let request = ConversionRequest::default();
        assert_eq!(request.source_dir(), Path::new(DEFAULT_SRC_DIR));
        assert_eq!(request.target_dir(), Path::new(DEFAULT_TARGET_DIR));
        assert_eq!(request.includes(), &["**/*.properties".to_string()]);
        assert!(request.excludes().is_empty());
        assert_eq!(request.encoding(), None);
        assert_eq!(request.direction(), Direction::Native2Ascii);
        assert_eq!(request.failure_policy(), FailurePolicy::FailFast);
        assert!(request.use_default_excludes());
    }

    #[test]
    fn test_blank_encoding_is_unset() {
        let request = ConversionRequest::default().with_encoding("  ");
        assert_eq!(request.encoding(), None);

        let request = ConversionRequest::default().with_encoding(" UTF-8 ");
        assert_eq!(request.encoding(), Some("UTF-8"));
    }

    #[test]
    fn test_validate_empty_dirs() {
        assert!(ConversionRequest::new("", "out").validate().is_err());
        assert!(ConversionRequest::new("in", "").validate().is_err());
        assert!(ConversionRequest::new("in", "out").validate().is_ok());
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = Settings::from_toml(
            r#"
            src_dir = "res"
            encoding = "Shift_JIS"
            includes = ["**/*.properties", "**/*.txt"]
            continue_on_error = true
            "#,
        )
        .unwrap();

        let request = settings.into_request();
        assert_eq!(request.source_dir(), Path::new("res"));
        assert_eq!(request.target_dir(), Path::new(DEFAULT_TARGET_DIR));
        assert_eq!(request.encoding(), Some("Shift_JIS"));
        assert_eq!(request.includes().len(), 2);
        assert_eq!(request.failure_policy(), FailurePolicy::ContinueOnError);
    }

    #[test]
    fn test_settings_unknown_key_rejected() {
        let err = Settings::from_toml("srcDir = \"x\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_settings_merge_precedence() {
        let file = Settings {
            encoding: Some("UTF-8".into()),
            jobs: Some(2),
            ..Default::default()
        };
        let cli = Settings {
            encoding: Some("ISO-8859-1".into()),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.encoding.as_deref(), Some("ISO-8859-1"));
        assert_eq!(merged.jobs, Some(2));
    }

    #[test]
    fn test_load_resolves_relative_dirs() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            "src_dir = \"i18n\"\ntarget_dir = \"out\"\nreverse = true\n",
        )
        .unwrap();

        let settings = Settings::load_from_dir(temp.path()).unwrap().unwrap();
        assert_eq!(settings.src_dir, Some(temp.path().join("i18n")));

        let request = settings.into_request();
        assert_eq!(request.target_dir(), temp.path().join("out"));
        assert_eq!(request.direction(), Direction::Ascii2Native);
    }

    #[test]
    fn test_load_from_dir_without_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Settings::load_from_dir(temp.path()).unwrap(), None);
    }
}
