// src/filesystem/path.rs

//! Structural path handling
//!
//! Output paths are computed by comparing path components, never by
//! removing the source root as a text prefix. Text prefix stripping
//! mis-handles roots that are a string prefix of a sibling directory
//! (`/src` vs `/src2`) and roots containing characters that a
//! search-and-replace treats specially.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Compute `path` relative to `root`
///
/// Both paths are made absolute first. The remainder must consist of
/// normal components only.
///
/// # Examples
///
/// ```
/// use native2ascii::filesystem::path::relative_to;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     relative_to(Path::new("/work/res"), Path::new("/work/res/i18n/a.properties")).unwrap(),
///     PathBuf::from("i18n/a.properties")
/// );
///
/// // A sibling that merely shares a text prefix is not under the root
/// assert!(relative_to(Path::new("/work/res"), Path::new("/work/res2/a.properties")).is_err());
/// ```
pub fn relative_to(root: &Path, path: &Path) -> Result<PathBuf> {
    let root = std::path::absolute(root)?;
    let path = std::path::absolute(path)?;

    let remainder = path.strip_prefix(&root).map_err(|_| Error::OutsideRoot {
        path: path.display().to_string(),
        root: root.display().to_string(),
    })?;

    let mut relative = PathBuf::new();
    for component in remainder.components() {
        match component {
            Component::Normal(c) => relative.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::PathTraversal(path.display().to_string()));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(Error::OutsideRoot {
                    path: path.display().to_string(),
                    root: root.display().to_string(),
                });
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::OutsideRoot {
            path: path.display().to_string(),
            root: root.display().to_string(),
        });
    }

    Ok(relative)
}

/// Rebase `file` from `source_root` onto `target_root`
///
/// ```
/// use native2ascii::filesystem::path::map_path;
/// use std::path::{Path, PathBuf};
///
/// let out = map_path(
///     Path::new("/project/src/main/native2ascii"),
///     Path::new("/project/target/classes"),
///     Path::new("/project/src/main/native2ascii/app/messages.properties"),
/// ).unwrap();
/// assert_eq!(out, PathBuf::from("/project/target/classes/app/messages.properties"));
/// ```
pub fn map_path(source_root: &Path, target_root: &Path, file: &Path) -> Result<PathBuf> {
    let relative = relative_to(source_root, file)?;
    Ok(std::path::absolute(target_root)?.join(relative))
}

/// Create the parent directory of `path`, including missing ancestors
///
/// Succeeds when the directory already exists, including when another
/// worker creates it concurrently.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::from_io(e, parent))?;
    }
    Ok(())
}

/// Render a relative path with `/` separators for pattern matching
pub fn to_slash(relative: &Path) -> String {
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(c) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&c.to_string_lossy());
        }
    }
    out
}
