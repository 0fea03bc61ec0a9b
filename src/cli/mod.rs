// src/cli/mod.rs
//! CLI definitions for native2ascii
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `resources` - Convert a resource tree (the main entry point)
//! - `encode` / `decode` - Convert a single file or stdin to stdout
//! - `completions` - Shell completion scripts

use clap::{Parser, Subcommand};
use clap_complete::Shell;

mod resources;
mod stream;

pub use resources::ResourcesArgs;
pub use stream::StreamArgs;

#[derive(Parser)]
#[command(name = "native2ascii")]
#[command(version)]
#[command(about = "Convert native-encoded resources to \\uXXXX-escaped ASCII", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every matching file under a source directory
    Resources(ResourcesArgs),

    /// Escape one file (or stdin) to ASCII
    Encode(StreamArgs),

    /// Unescape one file (or stdin) back to its native encoding
    Decode(StreamArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::parse_from(["native2ascii", "resources", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Resources(_))));

        assert!(Cli::try_parse_from(["native2ascii", "-q", "-v", "resources"]).is_err());
    }

    #[test]
    fn test_completion_shells() {
        // build.rs lists the same values for the man page
        let command = Cli::command();
        let shell = command
            .find_subcommand("completions")
            .and_then(|c| c.get_arguments().find(|a| a.get_id() == "shell"))
            .unwrap();
        let names: Vec<String> = shell
            .get_possible_values()
            .iter()
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, ["bash", "elvish", "fish", "powershell", "zsh"]);
    }
}
