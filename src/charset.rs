// src/charset.rs

//! Source encodings
//!
//! Encodings are looked up by label through `encoding_rs` (WHATWG labels such
//! as `utf-8`, `shift_jis`, `windows-1251`). Two encodings are handled here
//! directly because the WHATWG tables alias them to `windows-1252`:
//! - **ISO-8859-1**: every byte maps to the code point of the same value
//! - **US-ASCII**: bytes above 0x7F are invalid
//!
//! Decoding and encoding are strict. Invalid input is an error carrying the
//! byte offset, never a replacement character. Byte order marks are not
//! sniffed, so a declared encoding is always honoured. The one exception is
//! bare **UTF-16**, whose byte order is taken from a leading BOM (big-endian
//! when there is none); `UTF-16BE` and `UTF-16LE` stay strict.

use crate::error::{Error, Result};
use encoding_rs::{
    Decoder, DecoderResult, Encoder, EncoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8,
};
use std::env;
use std::fmt;
use std::io::{self, Read, Write};

/// Size of the read buffer used when streaming a source file
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Locale variables consulted for the platform default, in POSIX order
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso-8859-1:1987",
    "iso-ir-100",
    "8859-1",
    "latin1",
    "l1",
    "cp819",
    "ibm819",
    "csisolatin1",
];

/// Labels for UTF-16 with byte order taken from the BOM
const UTF16_LABELS: &[&str] = &["utf-16", "utf16", "unicode", "unicodebig"];

const ASCII_LABELS: &[&str] = &[
    "us-ascii",
    "ascii",
    "ascii7",
    "iso646-us",
    "iso-ir-6",
    "us",
    "cp367",
    "ibm367",
    "csascii",
    "ansi-x3.4-1968",
];

/// A character encoding usable for source files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Encoding from the WHATWG encoding standard
    Whatwg(&'static Encoding),
    /// ISO-8859-1, one byte per code point U+0000..U+00FF
    Latin1,
    /// Seven-bit US-ASCII
    Ascii,
    /// UTF-16 in the byte order of its BOM, big-endian without one
    Utf16,
}

impl Charset {
    /// Look up an encoding by label
    ///
    /// Labels are case-insensitive. Java-style names with underscores
    /// (`ISO8859_15`, `UTF_8`) are accepted as well.
    ///
    /// # Examples
    /// ```
    /// use native2ascii::Charset;
    ///
    /// assert_eq!(Charset::for_label("UTF-8").unwrap().name(), "UTF-8");
    /// assert_eq!(Charset::for_label("ISO8859_1").unwrap(), Charset::Latin1);
    /// assert!(Charset::for_label("klingon").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        let normalized = trimmed.to_ascii_lowercase().replace('_', "-");

        if LATIN1_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::Latin1);
        }
        if ASCII_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::Ascii);
        }
        if UTF16_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::Utf16);
        }

        Encoding::for_label(trimmed.as_bytes())
            .or_else(|| Encoding::for_label(normalized.as_bytes()))
            .map(Self::Whatwg)
            .ok_or_else(|| Error::UnsupportedEncoding(label.to_string()))
    }

    /// Encoding implied by the process locale, UTF-8 when none is set
    pub fn platform_default() -> Self {
        LOCALE_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty())
            .and_then(|locale| codeset_from_locale(&locale).map(str::to_string))
            .and_then(|codeset| Self::for_label(&codeset).ok())
            .unwrap_or(Self::Whatwg(UTF_8))
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        match *self {
            Self::Whatwg(encoding) => encoding.name(),
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
            Self::Utf16 => "UTF-16",
        }
    }

    /// Whether text can be written in this encoding
    pub fn can_encode(&self) -> bool {
        match *self {
            Self::Whatwg(encoding) => encoding.output_encoding() == encoding,
            Self::Latin1 | Self::Ascii => true,
            Self::Utf16 => false,
        }
    }

    /// Create a streaming decoder
    pub fn new_decoder(&self) -> TextDecoder {
        let inner = match *self {
            Self::Whatwg(encoding) => {
                DecoderKind::Whatwg(encoding.new_decoder_without_bom_handling())
            }
            Self::Latin1 => DecoderKind::Latin1,
            Self::Ascii => DecoderKind::Ascii,
            Self::Utf16 => DecoderKind::Utf16Detect(Vec::with_capacity(2)),
        };
        TextDecoder {
            name: self.name(),
            inner,
            consumed: 0,
        }
    }

    /// Stream `reader` through a decoder, handing decoded text to `sink`
    ///
    /// Reads in chunks of [`CHUNK_SIZE`]; the whole input is never held in
    /// memory. Returns the number of bytes read.
    pub fn decode_reader<R, F>(&self, mut reader: R, mut sink: F) -> Result<u64>
    where
        R: Read,
        F: FnMut(&str) -> Result<()>,
    {
        let mut decoder = self.new_decoder();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut text = String::new();

        loop {
            let n = match reader.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let last = n == 0;

            text.clear();
            decoder.decode(&buf[..n], &mut text, last)?;
            if !text.is_empty() {
                sink(&text)?;
            }
            if last {
                break;
            }
        }

        Ok(decoder.bytes_consumed())
    }

    /// Create a writer that encodes text into this charset
    pub fn new_writer<W: Write>(&self, inner: W) -> Result<CharsetWriter<W>> {
        let encoder = match *self {
            Self::Whatwg(encoding) => {
                if !self.can_encode() {
                    return Err(Error::UnsupportedOutputEncoding(encoding.name().to_string()));
                }
                EncoderKind::Whatwg(encoding.new_encoder())
            }
            Self::Latin1 => EncoderKind::Narrow(0xFF),
            Self::Ascii => EncoderKind::Narrow(0x7F),
            Self::Utf16 => {
                return Err(Error::UnsupportedOutputEncoding(self.name().to_string()));
            }
        };
        Ok(CharsetWriter {
            name: self.name(),
            inner,
            encoder,
            scratch: Vec::new(),
            bytes: 0,
        })
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Extract the codeset from a POSIX locale name
///
/// `language[_territory][.codeset][@modifier]`
///
/// ```
/// use native2ascii::charset::codeset_from_locale;
///
/// assert_eq!(codeset_from_locale("en_US.UTF-8"), Some("UTF-8"));
/// assert_eq!(codeset_from_locale("de_DE.ISO-8859-15@euro"), Some("ISO-8859-15"));
/// assert_eq!(codeset_from_locale("C"), None);
/// ```
pub fn codeset_from_locale(locale: &str) -> Option<&str> {
    let (_, rest) = locale.split_once('.')?;
    let codeset = rest.split('@').next().unwrap_or(rest);
    if codeset.is_empty() {
        None
    } else {
        Some(codeset)
    }
}

enum DecoderKind {
    Whatwg(Decoder),
    Latin1,
    Ascii,
    /// Collecting the first two bytes of bare UTF-16 input
    Utf16Detect(Vec<u8>),
}

/// Byte order of bare UTF-16 input and the length of its BOM
fn utf16_byte_order(head: &[u8]) -> (&'static Encoding, usize) {
    match Encoding::for_bom(head) {
        Some((encoding, len)) if encoding == UTF_16BE || encoding == UTF_16LE => (encoding, len),
        _ => (UTF_16BE, 0),
    }
}

/// Incremental strict decoder
pub struct TextDecoder {
    name: &'static str,
    inner: DecoderKind,
    consumed: u64,
}

impl TextDecoder {
    /// Decode a chunk into `dst`; `last` marks the end of input
    ///
    /// An incomplete multi-byte sequence at the end of a chunk is carried
    /// over to the next call, and reported as malformed when `last` is set.
    pub fn decode(&mut self, src: &[u8], dst: &mut String, last: bool) -> Result<()> {
        if let DecoderKind::Utf16Detect(head) = &mut self.inner {
            let take = (2 - head.len()).min(src.len());
            head.extend_from_slice(&src[..take]);
            if head.len() < 2 && !last {
                return Ok(());
            }

            let (encoding, bom_len) = utf16_byte_order(head);
            let mut pending = head.split_off(bom_len);
            pending.extend_from_slice(&src[take..]);
            self.consumed += bom_len as u64;
            self.inner = DecoderKind::Whatwg(encoding.new_decoder_without_bom_handling());
            return self.decode(&pending, dst, last);
        }

        match &mut self.inner {
            DecoderKind::Whatwg(decoder) => {
                let mut src = src;
                loop {
                    let needed = decoder
                        .max_utf8_buffer_length_without_replacement(src.len())
                        .unwrap_or(src.len() * 3 + 16);
                    dst.reserve(needed);

                    let (result, read) =
                        decoder.decode_to_string_without_replacement(src, dst, last);
                    src = &src[read..];
                    self.consumed += read as u64;

                    match result {
                        DecoderResult::InputEmpty => return Ok(()),
                        DecoderResult::OutputFull => dst.reserve(dst.capacity().max(64)),
                        DecoderResult::Malformed(bad, extra) => {
                            let back = u64::from(bad) + u64::from(extra);
                            return Err(Error::MalformedInput {
                                encoding: self.name,
                                offset: self.consumed.saturating_sub(back),
                            });
                        }
                    }
                }
            }
            DecoderKind::Latin1 => {
                dst.extend(src.iter().map(|&b| char::from(b)));
                self.consumed += src.len() as u64;
                Ok(())
            }
            DecoderKind::Ascii => {
                if let Some(pos) = src.iter().position(|b| !b.is_ascii()) {
                    return Err(Error::MalformedInput {
                        encoding: self.name,
                        offset: self.consumed + pos as u64,
                    });
                }
                dst.extend(src.iter().map(|&b| char::from(b)));
                self.consumed += src.len() as u64;
                Ok(())
            }
            DecoderKind::Utf16Detect(_) => Ok(()),
        }
    }

    /// Total bytes decoded so far
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }
}

enum EncoderKind {
    Whatwg(Encoder),
    /// Single-byte encoding covering U+0000 up to the given code point
    Narrow(u32),
}

/// Streaming writer that encodes text into a charset
pub struct CharsetWriter<W: Write> {
    name: &'static str,
    inner: W,
    encoder: EncoderKind,
    scratch: Vec<u8>,
    bytes: u64,
}

impl<W: Write> CharsetWriter<W> {
    /// Encode `text` and write it through
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.encode(text, false)
    }

    /// Bytes written to the inner writer so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flush encoder state and the inner writer
    pub fn finish(&mut self) -> Result<()> {
        self.encode("", true)?;
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn encode(&mut self, text: &str, last: bool) -> Result<()> {
        self.scratch.clear();

        match &mut self.encoder {
            EncoderKind::Whatwg(encoder) => {
                let mut src = text;
                loop {
                    let needed = encoder
                        .max_buffer_length_from_utf8_without_replacement(src.len())
                        .unwrap_or(src.len() * 4 + 16);
                    self.scratch.reserve(needed);

                    let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(
                        src,
                        &mut self.scratch,
                        last,
                    );
                    src = &src[read..];

                    match result {
                        EncoderResult::InputEmpty => break,
                        EncoderResult::OutputFull => {
                            self.scratch.reserve(self.scratch.capacity().max(64))
                        }
                        EncoderResult::Unmappable(ch) => {
                            return Err(Error::Unmappable {
                                encoding: self.name,
                                code_point: u32::from(ch),
                            });
                        }
                    }
                }
            }
            EncoderKind::Narrow(max) => {
                for ch in text.chars() {
                    let code_point = u32::from(ch);
                    if code_point > *max {
                        return Err(Error::Unmappable {
                            encoding: self.name,
                            code_point,
                        });
                    }
                    self.scratch.push(code_point as u8);
                }
            }
        }

        self.inner.write_all(&self.scratch)?;
        self.bytes += self.scratch.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(charset: Charset, bytes: &[u8]) -> Result<String> {
        let mut out = String::new();
        charset.decode_reader(bytes, |text| {
            out.push_str(text);
            Ok(())
        })?;
        Ok(out)
    }

    fn encode_all(charset: Charset, text: &str) -> Result<Vec<u8>> {
        let mut writer = charset.new_writer(Vec::new())?;
        writer.write_str(text)?;
        writer.finish()?;
        Ok(writer.into_inner())
    }

    #[test]
    fn test_for_label_variants() {
        assert_eq!(Charset::for_label("utf-8").unwrap().name(), "UTF-8");
        assert_eq!(Charset::for_label("UTF8").unwrap().name(), "UTF-8");
        assert_eq!(Charset::for_label(" Shift_JIS ").unwrap().name(), "Shift_JIS");
        assert_eq!(Charset::for_label("ISO8859_15").unwrap().name(), "ISO-8859-15");
        assert_eq!(Charset::for_label("latin1").unwrap(), Charset::Latin1);
        assert_eq!(Charset::for_label("US-ASCII").unwrap(), Charset::Ascii);
        assert_eq!(Charset::for_label("cp1252").unwrap().name(), "windows-1252");
    }

    #[test]
    fn test_for_label_unknown() {
        let err = Charset::for_label("EBCDIC-klingon").unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding(l) if l == "EBCDIC-klingon"));
    }

    #[test]
    fn test_codeset_from_locale() {
        assert_eq!(codeset_from_locale("ja_JP.eucJP"), Some("eucJP"));
        assert_eq!(codeset_from_locale("en_US.UTF-8@euro"), Some("UTF-8"));
        assert_eq!(codeset_from_locale("POSIX"), None);
        assert_eq!(codeset_from_locale("en_US."), None);
    }

    #[test]
    fn test_platform_default_is_usable() {
        assert!(Charset::platform_default().can_encode());
    }

    #[test]
    fn test_decode_utf8() {
        let text = decode_all(Charset::Whatwg(UTF_8), "gr\u{fc}\u{df}e".as_bytes()).unwrap();
        assert_eq!(text, "gr\u{fc}\u{df}e");
    }

    #[test]
    fn test_decode_keeps_bom() {
        let text = decode_all(Charset::Whatwg(UTF_8), b"\xEF\xBB\xBFa=b").unwrap();
        assert_eq!(text, "\u{feff}a=b");
    }

    #[test]
    fn test_decode_malformed_utf8_reports_offset() {
        let err = decode_all(Charset::Whatwg(UTF_8), b"abc\xFFdef").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput {
                encoding: "UTF-8",
                offset: 3
            }
        ));
    }

    #[test]
    fn test_decode_truncated_utf8_at_end() {
        let err = decode_all(Charset::Whatwg(UTF_8), b"ok\xC3").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { offset: 2, .. }));
    }

    #[test]
    fn test_decode_sequence_split_across_chunks() {
        let mut decoder = Charset::Whatwg(UTF_8).new_decoder();
        let mut out = String::new();
        decoder.decode(b"a\xC3", &mut out, false).unwrap();
        decoder.decode(b"\xA9b", &mut out, true).unwrap();
        assert_eq!(out, "a\u{e9}b");
        assert_eq!(decoder.bytes_consumed(), 4);
    }

    #[test]
    fn test_decode_latin1_all_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode_all(Charset::Latin1, &bytes).unwrap();
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text.chars().nth(0x80), Some('\u{80}'));
    }

    #[test]
    fn test_decode_ascii_rejects_high_bytes() {
        let err = decode_all(Charset::Ascii, b"plain\x80").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { offset: 5, .. }));
    }

    #[test]
    fn test_decode_shift_jis() {
        let charset = Charset::for_label("Shift_JIS").unwrap();
        let text = decode_all(charset, &[0x93, 0xFA, 0x96, 0x7B, 0x8C, 0xEA]).unwrap();
        assert_eq!(text, "\u{65e5}\u{672c}\u{8a9e}");
    }

    #[test]
    fn test_encode_round_trip() {
        let charset = Charset::for_label("windows-1251").unwrap();
        let bytes = encode_all(charset, "\u{41f}\u{440}\u{438}").unwrap();
        assert_eq!(decode_all(charset, &bytes).unwrap(), "\u{41f}\u{440}\u{438}");
    }

    #[test]
    fn test_encode_unmappable() {
        let err = encode_all(Charset::Latin1, "\u{20ac}").unwrap_err();
        assert!(matches!(
            err,
            Error::Unmappable {
                code_point: 0x20AC,
                ..
            }
        ));
    }

    #[test]
    fn test_utf16_labels() {
        assert_eq!(Charset::for_label("UTF-16").unwrap(), Charset::Utf16);
        assert_eq!(Charset::for_label("utf_16").unwrap(), Charset::Utf16);
        assert_eq!(Charset::for_label("UnicodeBig").unwrap(), Charset::Utf16);
        assert_eq!(Charset::for_label("UTF-16BE").unwrap().name(), "UTF-16BE");
        assert_eq!(Charset::for_label("UTF-16LE").unwrap().name(), "UTF-16LE");
    }

    #[test]
    fn test_decode_utf16_big_endian_bom() {
        let text = decode_all(Charset::Utf16, b"\xFE\xFF\x00A\x00=\x00\xE9").unwrap();
        assert_eq!(text, "A=\u{e9}");
    }

    #[test]
    fn test_decode_utf16_little_endian_bom() {
        let text = decode_all(Charset::Utf16, b"\xFF\xFEA\x00=\x00\xE9\x00").unwrap();
        assert_eq!(text, "A=\u{e9}");
    }

    #[test]
    fn test_decode_utf16_without_bom_is_big_endian() {
        let text = decode_all(Charset::Utf16, b"\x00A\x00=\x00\xE9").unwrap();
        assert_eq!(text, "A=\u{e9}");
    }

    #[test]
    fn test_decode_utf16_bom_split_across_chunks() {
        let mut decoder = Charset::Utf16.new_decoder();
        let mut out = String::new();
        decoder.decode(b"\xFF", &mut out, false).unwrap();
        decoder.decode(b"\xFEA", &mut out, false).unwrap();
        decoder.decode(b"\x00", &mut out, true).unwrap();
        assert_eq!(out, "A");
        assert_eq!(decoder.bytes_consumed(), 4);
    }

    #[test]
    fn test_decode_utf16_edge_lengths() {
        assert_eq!(decode_all(Charset::Utf16, b"").unwrap(), "");
        assert_eq!(decode_all(Charset::Utf16, b"\xFE\xFF").unwrap(), "");
        let err = decode_all(Charset::Utf16, b"\x00").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { encoding: "UTF-16", .. }));
    }

    #[test]
    fn test_declared_byte_order_keeps_bom() {
        let charset = Charset::for_label("UTF-16BE").unwrap();
        let text = decode_all(charset, b"\xFE\xFF\x00A").unwrap();
        assert_eq!(text, "\u{feff}A");
    }

    #[test]
    fn test_utf16_cannot_be_written() {
        assert!(!Charset::Utf16.can_encode());
        assert!(matches!(
            Charset::Utf16.new_writer(Vec::new()),
            Err(Error::UnsupportedOutputEncoding(_))
        ));

        let charset = Charset::for_label("UTF-16LE").unwrap();
        assert!(!charset.can_encode());
        assert!(matches!(
            charset.new_writer(Vec::new()),
            Err(Error::UnsupportedOutputEncoding(_))
        ));
    }
}
