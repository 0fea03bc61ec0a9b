// src/filesystem/walker.rs

//! Source tree discovery
//!
//! Patterns follow Ant directory-scanner conventions and are matched against
//! the `/`-separated path relative to the source root:
//! - `*` and `?` match within a single path segment
//! - `**` matches any number of segments, including none
//! - a pattern ending in `/` matches everything below that directory
//! - one pattern string may hold several patterns separated by commas

use super::path::{relative_to, to_slash};
use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Include patterns used when none are configured
pub const DEFAULT_INCLUDES: &[&str] = &["**/*.properties"];

/// Version-control and editor artefacts excluded unless disabled
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Editor backups and lock files
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    // CVS
    "**/CVS/**",
    "**/.cvsignore",
    // Subversion
    "**/.svn/**",
    // Git
    "**/.git/**",
    "**/.gitignore",
    "**/.gitattributes",
    // Mercurial
    "**/.hg/**",
    "**/.hgignore",
    // Bazaar
    "**/.bzr/**",
    // macOS
    "**/.DS_Store",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Path relative to the source root
    pub relative: PathBuf,
}

/// Compiled list of glob patterns
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile patterns, splitting comma-separated lists
    pub fn new<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let mut patterns = Vec::new();
        for spec in specs {
            for raw in spec.as_ref().split(',') {
                let Some(normalized) = normalize_pattern(raw) else {
                    continue;
                };
                let pattern = Pattern::new(&normalized).map_err(|e| Error::InvalidPattern {
                    pattern: raw.trim().to_string(),
                    reason: e.msg.to_string(),
                })?;
                patterns.push(pattern);
            }
        }
        Ok(Self { patterns })
    }

    /// Check whether any pattern matches a `/`-separated relative path
    pub fn matches(&self, relative: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    fn extend(&mut self, other: PatternSet) {
        self.patterns.extend(other.patterns);
    }
}

/// Normalize one pattern to glob syntax, `None` when it is blank
fn normalize_pattern(raw: &str) -> Option<String> {
    let mut pattern = raw.trim().replace('\\', "/");
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.to_string();
    }
    let pattern = pattern.trim_start_matches('/');
    if pattern.is_empty() {
        return None;
    }
    if pattern.ends_with('/') {
        Some(format!("{}**", pattern))
    } else {
        Some(pattern.to_string())
    }
}

/// Resolves include/exclude patterns against a source tree
#[derive(Debug, Clone)]
pub struct FileWalker {
    includes: PatternSet,
    excludes: PatternSet,
}

impl FileWalker {
    /// Build a walker; empty `includes` means [`DEFAULT_INCLUDES`]
    pub fn new<I, E>(includes: &[I], excludes: &[E], use_default_excludes: bool) -> Result<Self>
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        let mut include_set = PatternSet::new(includes)?;
        if include_set.is_empty() {
            include_set = PatternSet::new(DEFAULT_INCLUDES)?;
        }

        let mut exclude_set = PatternSet::new(excludes)?;
        if use_default_excludes {
            exclude_set.extend(PatternSet::new(DEFAULT_EXCLUDES)?);
        }

        Ok(Self {
            includes: include_set,
            excludes: exclude_set,
        })
    }

    /// Check a `/`-separated relative path against the patterns
    pub fn is_selected(&self, relative: &str) -> bool {
        self.includes.matches(relative) && !self.excludes.matches(relative)
    }

    /// List matching regular files under `root`, sorted by relative path
    ///
    /// A missing root yields an empty list. Symbolic links are followed.
    pub fn find_files(&self, root: &Path) -> Result<Vec<FileEntry>> {
        if !root.exists() {
            debug!("Source root {} does not exist", root.display());
            return Ok(Vec::new());
        }
        let root = std::path::absolute(root)?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Walk {
                path: e.path().unwrap_or(&root).display().to_string(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = relative_to(&root, entry.path())?;
            if self.is_selected(&to_slash(&relative)) {
                entries.push(FileEntry {
                    path: entry.into_path(),
                    relative,
                });
            } else {
                debug!("Skipping {}", relative.display());
            }
        }

        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}

/// Find files under `root` matching `includes` and not `excludes`
pub fn find_files<I, E>(
    root: &Path,
    includes: &[I],
    excludes: &[E],
    use_default_excludes: bool,
) -> Result<Vec<FileEntry>>
where
    I: AsRef<str>,
    E: AsRef<str>,
{
    FileWalker::new(includes, excludes, use_default_excludes)?.find_files(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NONE: &[&str] = &[];

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "k=v\n").unwrap();
    }

    fn relatives(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(|e| to_slash(&e.relative)).collect()
    }

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern(" **/*.properties "), Some("**/*.properties".into()));
        assert_eq!(normalize_pattern("./i18n/*.txt"), Some("i18n/*.txt".into()));
        assert_eq!(normalize_pattern("/abs/*.txt"), Some("abs/*.txt".into()));
        assert_eq!(normalize_pattern("legacy/"), Some("legacy/**".into()));
        assert_eq!(normalize_pattern("a\\b\\*.txt"), Some("a/b/*.txt".into()));
        assert_eq!(normalize_pattern("   "), None);
    }

    #[test]
    fn test_pattern_semantics() {
        let set = PatternSet::new(&["*.properties"]).unwrap();
        assert!(set.matches("a.properties"));
        assert!(!set.matches("dir/a.properties"));

        let set = PatternSet::new(&["**/*.properties"]).unwrap();
        assert!(set.matches("a.properties"));
        assert!(set.matches("x/y/a.properties"));
        assert!(!set.matches("x/a.txt"));

        let set = PatternSet::new(&["i18n/**"]).unwrap();
        assert!(set.matches("i18n/a.txt"));
        assert!(set.matches("i18n/de/a.txt"));
        assert!(!set.matches("other/a.txt"));
    }

    #[test]
    fn test_comma_separated_patterns() {
        let set = PatternSet::new(&["**/*.properties, **/*.txt", ""]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.matches("a/b.txt"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternSet::new(&["a**b/*.properties"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { pattern, .. } if pattern == "a**b/*.properties"));
    }

    #[test]
    fn test_default_includes_only_properties() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/b.properties");
        touch(temp.path(), "a/c.txt");

        let entries = find_files(temp.path(), NONE, NONE, true).unwrap();
        assert_eq!(relatives(&entries), vec!["a/b.properties"]);
        assert!(entries[0].path.is_absolute());
        assert!(entries[0].path.ends_with("a/b.properties"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let entries = find_files(&temp.path().join("absent"), NONE, NONE, true).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_excludes_and_ordering() {
        let temp = TempDir::new().unwrap();
        for rel in [
            "z.properties",
            "b/2.properties",
            "a/1.properties",
            "a/skip/3.properties",
            "B.properties",
        ] {
            touch(temp.path(), rel);
        }

        let entries = find_files(temp.path(), NONE, &["**/skip/**"], true).unwrap();
        assert_eq!(
            relatives(&entries),
            vec!["B.properties", "a/1.properties", "b/2.properties", "z.properties"]
        );
    }

    #[test]
    fn test_default_excludes() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".git/config.properties");
        touch(temp.path(), "CVS/x.properties");
        touch(temp.path(), "ok.properties");
        touch(temp.path(), "ok.properties~");

        let all = ["**/*"];
        let entries = find_files(temp.path(), &all, NONE, true).unwrap();
        assert_eq!(relatives(&entries), vec!["ok.properties"]);

        let entries = find_files(temp.path(), &all, NONE, false).unwrap();
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_directories_are_not_returned() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dir.properties")).unwrap();
        touch(temp.path(), "dir.properties/real.properties");

        let entries = find_files(temp.path(), NONE, NONE, true).unwrap();
        assert_eq!(relatives(&entries), vec!["dir.properties/real.properties"]);
    }
}
