// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: native encoding
fn encoding_arg() -> Arg {
    Arg::new("encoding")
        .short('e')
        .long("encoding")
        .value_name("ENCODING")
        .help("Encoding of the native files (default: platform encoding)")
}

fn flag(name: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(long).action(ArgAction::SetTrue).help(help)
}

fn stream_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("input").help("Input file, stdin when omitted or \"-\""))
        .arg(Arg::new("output").help("Output file, stdout when omitted or \"-\""))
        .arg(encoding_arg())
}

fn build_cli() -> Command {
    Command::new("native2ascii")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert native-encoded resources to \\uXXXX-escaped ASCII")
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log warnings and errors"),
        )
        .subcommand(
            Command::new("resources")
                .about("Convert every matching file under a source directory")
                .arg(
                    Arg::new("src_dir")
                        .long("src-dir")
                        .value_name("DIR")
                        .help("Directory holding the native resources (default: src/main/native2ascii)"),
                )
                .arg(
                    Arg::new("target_dir")
                        .long("target-dir")
                        .value_name("DIR")
                        .help("Directory receiving the converted files (default: target/classes)"),
                )
                .arg(encoding_arg())
                .arg(
                    Arg::new("include")
                        .short('i')
                        .long("include")
                        .value_name("PATTERN")
                        .action(ArgAction::Append)
                        .help("Include pattern, repeatable or comma separated (default: **/*.properties)"),
                )
                .arg(
                    Arg::new("exclude")
                        .short('x')
                        .long("exclude")
                        .value_name("PATTERN")
                        .action(ArgAction::Append)
                        .help("Exclude pattern, repeatable or comma separated"),
                )
                .arg(flag("reverse", "reverse", "Convert escaped ASCII back to the native encoding").short('r'))
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .value_name("N")
                        .help("Number of worker threads (default: one per CPU)"),
                )
                .arg(flag(
                    "continue_on_error",
                    "continue-on-error",
                    "Keep converting after a file fails, then report every failure",
                ))
                .arg(flag(
                    "no_default_excludes",
                    "no-default-excludes",
                    "Do not skip version-control and editor files",
                ))
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Settings file (default: ./native2ascii.toml when present)"),
                ),
        )
        .subcommand(stream_command("encode", "Escape one file (or stdin) to ASCII"))
        .subcommand(stream_command(
            "decode",
            "Unescape one file (or stdin) back to its native encoding",
        ))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("native2ascii.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
