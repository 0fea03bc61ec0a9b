// src/cli/stream.rs
//! Arguments for single-file conversion

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct StreamArgs {
    /// Input file, stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// Output file, stdout when omitted or "-"
    pub output: Option<PathBuf>,

    /// Native encoding (default: platform encoding)
    #[arg(short, long)]
    pub encoding: Option<String>,
}

impl StreamArgs {
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }

    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output.as_ref().filter(|p| p.as_os_str() != "-")
    }
}
