// src/lib.rs

//! native2ascii resource converter
//!
//! Converts text resources written in a native character encoding into
//! pure ASCII, escaping everything else as `\uXXXX` UTF-16 code units, the
//! form expected by Java-style `.properties` loaders. The reverse direction
//! is supported as well.
//!
//! # Architecture
//!
//! - `escape`: the `\uXXXX` codec, streaming in both directions
//! - `charset`: decoding and encoding of native bytes
//! - `filesystem`: source tree discovery and source-to-target path mapping
//! - `converter`: the batch driver, one worker task per file
//! - `config`: conversion requests and the TOML settings file
//! - `progress`: progress reporting hooks
//!
//! # Example
//!
//! ```no_run
//! use native2ascii::{convert, ConversionRequest};
//!
//! let request = ConversionRequest::new("src/main/native2ascii", "target/classes")
//!     .with_encoding("UTF-8");
//! let report = convert(request)?;
//! println!("{} file(s) converted", report.converted());
//! # Ok::<(), native2ascii::Error>(())
//! ```

pub mod charset;
pub mod config;
pub mod converter;
mod error;
pub mod escape;
pub mod filesystem;
pub mod progress;

pub use charset::Charset;
pub use config::{ConversionRequest, Direction, FailurePolicy, Settings};
pub use converter::{
    convert, convert_file, resolve_charset, BatchStatus, ConversionOutcome, ConversionReport,
    Converter, FailureKind, FileStats,
};
pub use error::{Error, Result};
pub use progress::{CallbackProgress, LogProgress, ProgressEvent, ProgressTracker, SilentProgress};
