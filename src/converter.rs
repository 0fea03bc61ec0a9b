// src/converter.rs

//! Batch conversion driver
//!
//! Ties discovery, path mapping and the escape codec together. Each file
//! moves through `Discovered -> Decoding -> Encoding -> Written`, or ends in
//! `Failed`. Files are independent and are converted on a rayon pool.
//!
//! Outcomes of a batch:
//! - source directory missing: warning, empty report with
//!   [`BatchStatus::SourceMissing`]
//! - unknown encoding, invalid pattern, walk failure: `Err` before any file
//!   is touched
//! - file failure under [`FailurePolicy::FailFast`]: `Err(Error::Conversion)`
//!   naming the file
//! - file failure under [`FailurePolicy::ContinueOnError`]: logged, recorded
//!   in the report, remaining files still converted

use crate::charset::{Charset, CHUNK_SIZE};
use crate::config::{ConversionRequest, Direction, FailurePolicy};
use crate::error::{Error, Result};
use crate::escape::{EscapeWriter, Unescaper};
use crate::filesystem::{ensure_parent_dir, map_path, FileEntry, FileWalker};
use crate::progress::{ProgressTracker, SilentProgress};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Character and byte counts for one converted file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Characters decoded from the source
    pub characters: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Broad classification of a per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Io,
    PermissionDenied,
    /// Bytes invalid for the encoding, bad escapes, unmappable characters
    MalformedInput,
    UnsupportedEncoding,
}

impl FailureKind {
    /// Classify an error, looking through [`Error::Conversion`]
    pub fn of(err: &Error) -> Self {
        match err {
            Error::Conversion { source, .. } => Self::of(source),
            Error::PermissionDenied(_) => Self::PermissionDenied,
            Error::MalformedInput { .. } | Error::Escape(_) | Error::Unmappable { .. } => {
                Self::MalformedInput
            }
            Error::UnsupportedEncoding(_) | Error::UnsupportedOutputEncoding(_) => {
                Self::UnsupportedEncoding
            }
            _ => Self::Io,
        }
    }
}

/// Result of converting one file
#[derive(Debug)]
pub enum ConversionOutcome {
    Converted {
        source: PathBuf,
        target: PathBuf,
        stats: FileStats,
    },
    Failed {
        source: PathBuf,
        kind: FailureKind,
        error: Error,
    },
}

impl ConversionOutcome {
    /// Source file this outcome belongs to
    pub fn source(&self) -> &Path {
        match self {
            Self::Converted { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    /// Whether the file was converted and written
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Discovery ran and every discovered file was attempted
    Completed,
    /// The source directory does not exist; nothing was done
    SourceMissing,
}

/// Aggregate result of a batch
#[derive(Debug)]
pub struct ConversionReport {
    status: BatchStatus,
    charset: Option<Charset>,
    outcomes: Vec<ConversionOutcome>,
}

impl ConversionReport {
    fn source_missing() -> Self {
        Self {
            status: BatchStatus::SourceMissing,
            charset: None,
            outcomes: Vec::new(),
        }
    }

    /// How the batch ended
    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// Encoding used to read or write native files, if the batch got that far
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    /// Per-file outcomes in discovery order
    pub fn outcomes(&self) -> &[ConversionOutcome] {
        &self.outcomes
    }

    /// Number of files written
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of files that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.converted()
    }

    /// Failed outcomes in discovery order
    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Whether no file failed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Turn recorded failures into [`Error::BatchFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::BatchFailed {
                failed: self.failed(),
                total: self.outcomes.len(),
            })
        }
    }
}

/// Resolve the configured encoding, falling back to the platform default
///
/// An absent encoding is a warning, never an error. An unknown label is an
/// error.
pub fn resolve_charset(encoding: Option<&str>) -> Result<Charset> {
    match encoding {
        Some(label) => Charset::for_label(label),
        None => {
            let charset = Charset::platform_default();
            warn!(
                "Using platform encoding ({} actually) to convert resources!",
                charset
            );
            Ok(charset)
        }
    }
}

/// Runs a [`ConversionRequest`]
pub struct Converter {
    request: ConversionRequest,
}

impl Converter {
    /// Create a converter for `request`
    pub fn new(request: ConversionRequest) -> Self {
        Self { request }
    }

    /// The request this converter runs
    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    /// Convert every matching file
    pub fn run(&self, progress: &dyn ProgressTracker) -> Result<ConversionReport> {
        let request = &self.request;
        request.validate()?;

        let source_dir = request.source_dir();
        if !source_dir.exists() {
            warn!(
                "Source directory does not exist: {}",
                absolute_display(source_dir)
            );
            progress.finish("Source directory missing, nothing to convert");
            return Ok(ConversionReport::source_missing());
        }

        let charset = resolve_charset(request.encoding())?;
        if request.direction() == Direction::Ascii2Native && !charset.can_encode() {
            return Err(Error::UnsupportedOutputEncoding(charset.name().to_string()));
        }
        debug!("Converting with {} ({:?})", charset, request.direction());

        let target_dir = request.target_dir();
        fs::create_dir_all(target_dir).map_err(|e| Error::from_io(e, target_dir))?;

        info!("Includes: {:?}", request.includes());
        info!("Excludes: {:?}", request.excludes());
        let walker = FileWalker::new(
            request.includes(),
            request.excludes(),
            request.use_default_excludes(),
        )?;
        let files = walker.find_files(source_dir)?;
        info!(
            "Found {} file(s) to convert in {}",
            files.len(),
            absolute_display(source_dir)
        );
        progress.set_total(files.len() as u64);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(request.jobs())
            .thread_name(|i| format!("native2ascii-{}", i))
            .build()
            .map_err(|e| Error::Config(format!("failed to start worker pool: {}", e)))?;

        let outcomes = match request.failure_policy() {
            FailurePolicy::FailFast => {
                // Files after the earliest failure seen so far are skipped, so
                // the reported failure is always the first in discovery order
                let first_failure = AtomicUsize::new(usize::MAX);
                let attempted: Vec<Option<ConversionOutcome>> = pool.install(|| {
                    files
                        .par_iter()
                        .enumerate()
                        .map(|(index, entry)| {
                            if index > first_failure.load(Ordering::Relaxed) {
                                return None;
                            }
                            let outcome = self.convert_entry(entry, charset, progress);
                            if !outcome.is_success() {
                                first_failure.fetch_min(index, Ordering::Relaxed);
                            }
                            Some(outcome)
                        })
                        .collect()
                });

                let mut outcomes = Vec::with_capacity(attempted.len());
                for outcome in attempted.into_iter().flatten() {
                    if let ConversionOutcome::Failed { source, error, .. } = outcome {
                        progress.finish("Conversion aborted");
                        return Err(Error::for_file(source.display().to_string(), error));
                    }
                    outcomes.push(outcome);
                }
                outcomes
            }
            FailurePolicy::ContinueOnError => pool.install(|| {
                files
                    .par_iter()
                    .map(|entry| {
                        let outcome = self.convert_entry(entry, charset, progress);
                        if let ConversionOutcome::Failed { source, error, .. } = &outcome {
                            error!("Unable to convert {}: {}", source.display(), error);
                        }
                        outcome
                    })
                    .collect::<Vec<_>>()
            }),
        };

        let report = ConversionReport {
            status: BatchStatus::Completed,
            charset: Some(charset),
            outcomes,
        };
        let summary = format!(
            "Converted {} of {} file(s) into {}",
            report.converted(),
            report.outcomes.len(),
            absolute_display(target_dir)
        );
        info!("{}", summary);
        progress.finish(&summary);

        Ok(report)
    }

    fn convert_entry(
        &self,
        entry: &FileEntry,
        charset: Charset,
        progress: &dyn ProgressTracker,
    ) -> ConversionOutcome {
        info!("Processing {}", entry.path.display());
        progress.file_started(&entry.path);

        let result = map_path(
            self.request.source_dir(),
            self.request.target_dir(),
            &entry.path,
        )
        .and_then(|target| {
            convert_file(&entry.path, &target, charset, self.request.direction())
                .map(|stats| (target, stats))
        });

        match result {
            Ok((target, stats)) => {
                debug!(
                    "Wrote {} ({} characters, {} bytes in, {} bytes out)",
                    target.display(),
                    stats.characters,
                    stats.bytes_read,
                    stats.bytes_written
                );
                progress.file_converted(&entry.path);
                ConversionOutcome::Converted {
                    source: entry.path.clone(),
                    target,
                    stats,
                }
            }
            Err(error) => {
                progress.file_failed(&entry.path, &error.to_string());
                ConversionOutcome::Failed {
                    source: entry.path.clone(),
                    kind: FailureKind::of(&error),
                    error,
                }
            }
        }
    }
}

/// Run a request without progress output
pub fn convert(request: ConversionRequest) -> Result<ConversionReport> {
    Converter::new(request).run(&SilentProgress::new())
}

/// Convert one file, replacing `target` atomically
///
/// Output goes to a temporary file next to `target` and is renamed into
/// place once complete, so a failed conversion never leaves a partial file.
pub fn convert_file(
    source: &Path,
    target: &Path,
    charset: Charset,
    direction: Direction,
) -> Result<FileStats> {
    let input = File::open(source).map_err(|e| Error::from_io(e, source))?;

    ensure_parent_dir(target)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = temp_file_in(dir).map_err(|e| Error::from_io(e, dir))?;

    let stats = {
        let writer = BufWriter::new(temp.as_file_mut());
        match direction {
            Direction::Native2Ascii => native_to_ascii(input, writer, charset)?,
            Direction::Ascii2Native => ascii_to_native(input, writer, charset)?,
        }
    };

    temp.persist(target)
        .map_err(|e| Error::from_io(e.error, target))?;
    Ok(stats)
}

fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".native2ascii-").suffix(".tmp");
    #[cfg(unix)]
    {
        // Same mode File::create would use, before umask
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Decode `reader` as `charset` and write escaped ASCII to `writer`
pub fn native_to_ascii<R: Read, W: Write>(
    reader: R,
    writer: W,
    charset: Charset,
) -> Result<FileStats> {
    let mut escaper = EscapeWriter::new(writer);
    let bytes_read =
        charset.decode_reader(reader, |text| escaper.write_str(text).map_err(Error::from))?;
    let characters = escaper.chars_written();
    let bytes_written = escaper.bytes_written();
    escaper.finish()?;

    Ok(FileStats {
        characters,
        bytes_read,
        bytes_written,
    })
}

/// Unescape ASCII from `reader` and write it to `writer` as `charset`
pub fn ascii_to_native<R: Read, W: Write>(
    mut reader: R,
    writer: W,
    charset: Charset,
) -> Result<FileStats> {
    let mut output = charset.new_writer(writer)?;
    let mut unescaper = Unescaper::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut text = String::new();
    let mut bytes_read = 0u64;
    let mut characters = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        bytes_read += n as u64;

        text.clear();
        unescaper.feed(&buf[..n], &mut text)?;
        characters += text.chars().count() as u64;
        output.write_str(&text)?;
    }

    text.clear();
    unescaper.finish(&mut text)?;
    characters += text.chars().count() as u64;
    output.write_str(&text)?;
    output.finish()?;

    Ok(FileStats {
        characters,
        bytes_read,
        bytes_written: output.bytes_written(),
    })
}

fn absolute_display(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
