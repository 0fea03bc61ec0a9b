// src/commands/resources.rs
//! Batch conversion of a resource tree

use super::progress::CliProgress;
use crate::cli::ResourcesArgs;
use anyhow::{Context, Result};
use native2ascii::config::DEFAULT_CONFIG_FILE;
use native2ascii::{BatchStatus, ConversionRequest, Converter, LogProgress, Settings};
use std::io::IsTerminal;
use std::path::Path;
use tracing::debug;

/// Build the request from the settings file and command line flags
///
/// Flags override the file; the file overrides built-in defaults.
pub fn build_request(args: &ResourcesArgs) -> Result<ConversionRequest> {
    let file_settings = match &args.config {
        Some(path) => Some(
            Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        ),
        None => Settings::load_from_dir(Path::new("."))
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE))?,
    };

    let settings = match file_settings {
        Some(file) => {
            debug!("Using settings file");
            file.merge(args.to_settings())
        }
        None => args.to_settings(),
    };
    Ok(settings.into_request())
}

/// Convert every matching file under the source directory
pub fn cmd_resources(args: &ResourcesArgs, quiet: bool) -> Result<()> {
    let request = build_request(args)?;
    let converter = Converter::new(request);

    let report = if !quiet && std::io::stderr().is_terminal() {
        let progress = CliProgress::new("Converting");
        let result = converter.run(&progress);
        if let Err(e) = &result {
            progress.abandon(&e.to_string());
        }
        result?
    } else {
        converter.run(&LogProgress::new("native2ascii"))?
    };

    if report.status() == BatchStatus::SourceMissing {
        return Ok(());
    }

    let total = report.outcomes().len();
    let converted = report.converted();
    report.into_result()?;

    if !quiet {
        println!("Converted {} of {} file(s)", converted, total);
    }
    Ok(())
}
