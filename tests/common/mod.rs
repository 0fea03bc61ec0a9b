// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch project with a source and a target directory.
///
/// Keep the value alive for the duration of the test; dropping it removes
/// the tree.
pub struct Project {
    pub temp: TempDir,
    pub src: PathBuf,
    pub target: PathBuf,
}

impl Project {
    /// Create a project whose source directory exists but is empty.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src/main/native2ascii");
        let target = temp.path().join("target/classes");
        fs::create_dir_all(&src).unwrap();
        Self { temp, src, target }
    }

    /// Create a project without a source directory.
    pub fn without_source() -> Self {
        let project = Self::new();
        fs::remove_dir_all(&project.src).unwrap();
        project
    }

    /// Write `bytes` to `relative` under the source directory.
    pub fn write_source(&self, relative: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.src, relative, bytes)
    }

    /// Write `bytes` to `relative` under the target directory.
    pub fn write_target(&self, relative: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.target, relative, bytes)
    }

    /// Read a converted file as bytes.
    pub fn read_target(&self, relative: &str) -> Vec<u8> {
        fs::read(self.target.join(relative)).unwrap()
    }

    /// Relative, `/`-separated paths of every file in the target tree.
    pub fn target_files(&self) -> Vec<String> {
        list_files(&self.target)
    }
}

fn write_file(root: &Path, relative: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

/// Sorted relative paths of all regular files under `root`.
pub fn list_files(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}
