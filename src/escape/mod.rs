// src/escape/mod.rs

//! Unicode escape codec
//!
//! Converts text to an ASCII-only form where every character that is not
//! printable ASCII (or one of TAB, LF, CR, FF) is written as `\uXXXX`, one
//! sequence per UTF-16 code unit, with lowercase hex digits. The backslash
//! itself is always written as `\u005c`, so every `\` in encoded output
//! starts an escape.
//!
//! | Input        | Output          |
//! |--------------|-----------------|
//! | `key=value`  | `key=value`     |
//! | `a\b`        | `a\u005cb`      |
//! | `é`          | `\u00e9`        |
//! | `😀`         | `\ud83d\ude00`  |
//!
//! Both directions stream: [`EscapeWriter`] accepts text in chunks of any
//! size, and [`Unescaper`] accepts byte chunks and keeps escape state across
//! chunk boundaries.
//!
//! # Example
//!
//! ```
//! use native2ascii::escape;
//!
//! let encoded = escape::encode("caf\u{e9} \\ bar");
//! assert_eq!(encoded, "caf\\u00e9 \\u005c bar");
//! assert_eq!(escape::decode(encoded.as_bytes()).unwrap(), "caf\u{e9} \\ bar");
//! ```

mod decoder;
mod encoder;

pub use decoder::{decode, EscapeError, Unescaper};
pub use encoder::{encode, escape_str_into, is_literal, EscapeWriter};

/// Code unit of the backslash character
pub const BACKSLASH: u16 = 0x5C;

/// Length in bytes of one `\uXXXX` sequence
pub const ESCAPE_LEN: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(""), "");
        assert_eq!(decode(b"").unwrap(), "");
    }

    #[test]
    fn test_backslash_always_escaped() {
        assert_eq!(encode("a\\b"), "a\\u005cb");
        assert_eq!(encode("\\\\"), "\\u005c\\u005c");
    }

    #[test]
    fn test_latin_small_e_acute() {
        assert_eq!(encode("\u{e9}"), "\\u00e9");
    }

    #[test]
    fn test_round_trip_mixed_text() {
        let samples = [
            "greeting=Hello, World!",
            "path=C:\\Program Files\\app",
            "ja=\u{65e5}\u{672c}\u{8a9e}\n",
            "emoji=\u{1f600}\t\u{1f680}\r\n",
            "nul=\u{0}\u{7f}\u{80}",
            "literal=\\u0041 stays literal",
        ];
        for sample in samples {
            let encoded = encode(sample);
            assert!(encoded.is_ascii(), "non-ASCII output for {:?}", sample);
            assert_eq!(decode(encoded.as_bytes()).unwrap(), sample);
        }
    }

    #[test]
    fn test_escape_len_matches_output() {
        assert_eq!(encode("\u{1}").len(), ESCAPE_LEN);
        assert_eq!(encode("\\").len(), ESCAPE_LEN);
        assert!(!is_literal(BACKSLASH));
    }
}
