// src/commands/stream.rs
//! Single-file conversion between files, stdin and stdout

use crate::cli::StreamArgs;
use anyhow::{Context, Result};
use native2ascii::converter::{ascii_to_native, native_to_ascii};
use native2ascii::{convert_file, resolve_charset, Direction, FileStats};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use tracing::debug;

/// Escape native text to ASCII
pub fn cmd_encode(args: &StreamArgs) -> Result<()> {
    run(args, Direction::Native2Ascii)
}

/// Unescape ASCII back to native text
pub fn cmd_decode(args: &StreamArgs) -> Result<()> {
    run(args, Direction::Ascii2Native)
}

fn run(args: &StreamArgs, direction: Direction) -> Result<()> {
    let encoding = args.encoding.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let charset = resolve_charset(encoding)?;

    let stats = match (args.input_path(), args.output_path()) {
        // Both ends are files: write atomically next to the target
        (Some(input), Some(output)) => convert_file(input, output, charset, direction)
            .with_context(|| format!("Unable to convert {}", input.display()))?,
        (input, output) => {
            let reader: Box<dyn Read> = match input {
                Some(path) => Box::new(
                    File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                ),
                None => Box::new(io::stdin().lock()),
            };
            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                ),
                None => Box::new(io::stdout().lock()),
            };
            convert_stream(reader, BufWriter::new(writer), charset, direction)?
        }
    };

    debug!(
        "{:?}: {} bytes in, {} bytes out",
        direction, stats.bytes_read, stats.bytes_written
    );
    Ok(())
}

fn convert_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    charset: native2ascii::Charset,
    direction: Direction,
) -> Result<FileStats> {
    let stats = match direction {
        Direction::Native2Ascii => native_to_ascii(reader, writer, charset)?,
        Direction::Ascii2Native => ascii_to_native(reader, writer, charset)?,
    };
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use native2ascii::Charset;
    use tempfile::TempDir;

    #[test]
    fn test_convert_stream_both_directions() {
        let charset = Charset::for_label("windows-1251").unwrap();

        let mut ascii = Vec::new();
        convert_stream(&b"k=\xCF\xF0\xE8\n"[..], &mut ascii, charset, Direction::Native2Ascii)
            .unwrap();
        assert_eq!(ascii, b"k=\\u041f\\u0440\\u0438\n");

        let mut native = Vec::new();
        convert_stream(&ascii[..], &mut native, charset, Direction::Ascii2Native).unwrap();
        assert_eq!(native, b"k=\xCF\xF0\xE8\n");
    }

    #[test]
    fn test_encode_file_to_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.txt");
        let output = temp.path().join("out/out.txt");
        std::fs::write(&input, "\u{1F600}\\").unwrap();

        let args = StreamArgs {
            input: Some(input),
            output: Some(output.clone()),
            encoding: Some("UTF-8".into()),
        };
        cmd_encode(&args).unwrap();
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "\\ud83d\\ude00\\u005c"
        );
    }

    #[test]
    fn test_decode_rejects_unknown_encoding() {
        let args = StreamArgs {
            encoding: Some("no-such-charset".into()),
            ..Default::default()
        };
        assert!(cmd_decode(&args).is_err());
    }
}
