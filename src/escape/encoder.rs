// src/escape/encoder.rs

//! Text to escaped ASCII

use std::io::{self, Write};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Check whether a UTF-16 code unit is written as itself
///
/// Printable ASCII and the whitespace controls TAB, LF, FF and CR pass
/// through; the backslash never does.
#[inline]
pub fn is_literal(unit: u16) -> bool {
    match unit {
        super::BACKSLASH => false,
        0x20..=0x7E => true,
        0x09 | 0x0A | 0x0C | 0x0D => true,
        _ => false,
    }
}

#[inline]
fn push_unit(unit: u16, out: &mut Vec<u8>) {
    if is_literal(unit) {
        out.push(unit as u8);
    } else {
        out.extend_from_slice(&[
            b'\\',
            b'u',
            HEX_DIGITS[usize::from(unit >> 12)],
            HEX_DIGITS[usize::from((unit >> 8) & 0xF)],
            HEX_DIGITS[usize::from((unit >> 4) & 0xF)],
            HEX_DIGITS[usize::from(unit & 0xF)],
        ]);
    }
}

/// Append the escaped form of `text` to `out`
pub fn escape_str_into(text: &str, out: &mut Vec<u8>) {
    let mut units = [0u16; 2];
    for ch in text.chars() {
        for &unit in ch.encode_utf16(&mut units).iter() {
            push_unit(unit, out);
        }
    }
}

/// Escape a whole string
pub fn encode(text: &str) -> String {
    let mut out = Vec::with_capacity(text.len());
    escape_str_into(text, &mut out);
    // Every byte pushed above is ASCII
    out.into_iter().map(char::from).collect()
}

/// Streaming escaper over any writer
///
/// Each call to [`write_str`](Self::write_str) escapes one chunk and hands it
/// to the inner writer, so memory use is bounded by the largest chunk.
pub struct EscapeWriter<W: Write> {
    inner: W,
    scratch: Vec<u8>,
    chars: u64,
    bytes: u64,
}

impl<W: Write> EscapeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            scratch: Vec::new(),
            chars: 0,
            bytes: 0,
        }
    }

    /// Escape `text` and write it through
    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.scratch.clear();
        escape_str_into(text, &mut self.scratch);
        self.inner.write_all(&self.scratch)?;
        self.chars += text.chars().count() as u64;
        self.bytes += self.scratch.len() as u64;
        Ok(())
    }

    /// Number of characters consumed so far
    pub fn chars_written(&self) -> u64 {
        self.chars
    }

    /// Number of ASCII bytes produced so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
