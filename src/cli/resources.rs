// src/cli/resources.rs
//! Arguments for batch conversion of a resource tree

use clap::Args;
use native2ascii::Settings;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct ResourcesArgs {
    /// Directory holding the native resources (default: src/main/native2ascii)
    #[arg(long, value_name = "DIR")]
    pub src_dir: Option<PathBuf>,

    /// Directory receiving the converted files (default: target/classes)
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Encoding of the native files (default: platform encoding)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Include pattern, repeatable or comma separated (default: **/*.properties)
    #[arg(short, long = "include", value_name = "PATTERN")]
    pub includes: Vec<String>,

    /// Exclude pattern, repeatable or comma separated
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Convert escaped ASCII back to the native encoding
    #[arg(short, long)]
    pub reverse: bool,

    /// Number of worker threads (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Keep converting after a file fails, then report every failure
    #[arg(long)]
    pub continue_on_error: bool,

    /// Do not skip version-control and editor files
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Settings file (default: ./native2ascii.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ResourcesArgs {
    /// Settings given on the command line; unset flags leave the field empty
    pub fn to_settings(&self) -> Settings {
        Settings {
            src_dir: self.src_dir.clone(),
            target_dir: self.target_dir.clone(),
            encoding: self.encoding.clone(),
            includes: (!self.includes.is_empty()).then(|| self.includes.clone()),
            excludes: (!self.excludes.is_empty()).then(|| self.excludes.clone()),
            reverse: self.reverse.then_some(true),
            jobs: self.jobs,
            continue_on_error: self.continue_on_error.then_some(true),
            default_excludes: self.no_default_excludes.then_some(false),
        }
    }
}
