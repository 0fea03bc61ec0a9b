// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log level used when RUST_LOG is not set
fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for encode/decode output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose, cli.quiet))),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Resources(args)) => commands::cmd_resources(&args, cli.quiet),
        Some(Commands::Encode(args)) => commands::cmd_encode(&args),
        Some(Commands::Decode(args)) => commands::cmd_decode(&args),
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            // No command provided, show help
            println!("native2ascii v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'native2ascii --help' for usage information");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0, false), "info");
        assert_eq!(default_filter(1, false), "debug");
        assert_eq!(default_filter(3, false), "trace");
        assert_eq!(default_filter(0, true), "warn");
    }
}
