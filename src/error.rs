// src/error.rs

//! Error types for native2ascii
//!
//! Every fallible library operation returns [`Result`]. Per-file failures are
//! wrapped in [`Error::Conversion`] so the offending path travels with the
//! underlying cause.

use std::io;
use thiserror::Error;

use crate::escape::EscapeError;

/// Errors produced by the conversion library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Access to a file or directory was refused
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Encoding label not known to the charset layer
    #[error("Unsupported character encoding: {0}")]
    UnsupportedEncoding(String),

    /// Encoding can be decoded but cannot be written
    #[error("Encoding {0} cannot be used for output")]
    UnsupportedOutputEncoding(String),

    /// Input bytes are not valid in the declared encoding
    #[error("Input is not valid {encoding} at byte offset {offset}")]
    MalformedInput { encoding: &'static str, offset: u64 },

    /// A character has no representation in the output encoding
    #[error("Character U+{code_point:04X} cannot be represented in {encoding}")]
    Unmappable {
        encoding: &'static str,
        code_point: u32,
    },

    /// Escaped input could not be decoded
    #[error(transparent)]
    Escape(#[from] EscapeError),

    /// Include or exclude pattern failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Scanning the source tree failed
    #[error("Failed to scan {path}: {reason}")]
    Walk { path: String, reason: String },

    /// File lies outside the source root it was mapped from
    #[error("Path {path} is not under source directory {root}")]
    OutsideRoot { path: String, root: String },

    /// Relative path tries to leave its root
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    /// A single file failed to convert
    #[error("Unable to convert {path}: {source}")]
    Conversion {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// Some files failed while running with continue-on-error
    #[error("{failed} of {total} files failed to convert")]
    BatchFailed { failed: usize, total: usize },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file is not valid TOML for the settings schema
    #[error("Failed to parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for native2ascii operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error with the path of the file being converted
    pub fn for_file(path: impl Into<String>, source: Error) -> Self {
        Self::Conversion {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Map an I/O error, promoting permission failures to their own variant
    pub fn from_io(err: io::Error, path: &std::path::Path) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied(path.display().to_string())
        } else {
            Self::Io(err)
        }
    }
}
