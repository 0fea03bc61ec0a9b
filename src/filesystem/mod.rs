// src/filesystem/mod.rs

//! Filesystem operations
//!
//! This module provides:
//! - Source tree discovery with Ant-style include/exclude patterns
//! - Structural mapping of source paths onto the target tree

pub mod path;
mod walker;

pub use path::{ensure_parent_dir, map_path, relative_to};
pub use walker::{
    find_files, FileEntry, FileWalker, PatternSet, DEFAULT_EXCLUDES, DEFAULT_INCLUDES,
};
