// src/escape/decoder.rs

//! Escaped ASCII back to text

use thiserror::Error;

use super::BACKSLASH;

/// Errors raised while decoding escaped input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    /// `\u` followed by something other than four hex digits
    #[error("Malformed escape at byte offset {offset}: expected hex digit, found {found:?}")]
    MalformedEscape { offset: u64, found: char },

    /// Input ended inside a `\u` sequence
    #[error("Truncated escape at byte offset {offset}")]
    TruncatedEscape { offset: u64 },

    /// Surrogate code unit without its partner
    #[error("Unpaired surrogate \\u{unit:04x} at byte offset {offset}")]
    UnpairedSurrogate { offset: u64, unit: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    /// Saw `\` at `start`
    Backslash { start: u64 },
    /// Inside `\u`, `digits` hex digits read so far
    Hex { start: u64, digits: u8, value: u16 },
}

/// Streaming decoder for escaped input
///
/// Feed byte chunks with [`feed`](Self::feed) and call
/// [`finish`](Self::finish) once the input is exhausted. A chunk boundary may
/// fall anywhere, including inside an escape or between the two halves of a
/// surrogate pair.
#[derive(Debug)]
pub struct Unescaper {
    state: State,
    /// Pending high surrogate and the offset it came from
    high: Option<(u16, u64)>,
    offset: u64,
}

impl Default for Unescaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Unescaper {
    pub fn new() -> Self {
        Self {
            state: State::Text,
            high: None,
            offset: 0,
        }
    }

    /// Decode a chunk, appending complete characters to `out`
    pub fn feed(&mut self, input: &[u8], out: &mut String) -> Result<(), EscapeError> {
        for &byte in input {
            let pos = self.offset;
            self.offset += 1;
            self.step(byte, pos, out)?;
        }
        Ok(())
    }

    /// Finish decoding, flushing a trailing lone backslash
    pub fn finish(mut self, out: &mut String) -> Result<(), EscapeError> {
        match self.state {
            State::Text => {}
            State::Backslash { start } => {
                self.state = State::Text;
                self.push_unit(BACKSLASH, start, out)?;
            }
            State::Hex { start, .. } => {
                return Err(EscapeError::TruncatedEscape { offset: start });
            }
        }

        if let Some((unit, offset)) = self.high {
            return Err(EscapeError::UnpairedSurrogate { offset, unit });
        }
        Ok(())
    }

    fn step(&mut self, byte: u8, pos: u64, out: &mut String) -> Result<(), EscapeError> {
        match self.state {
            State::Text => {
                if byte == b'\\' {
                    self.state = State::Backslash { start: pos };
                    Ok(())
                } else {
                    self.push_unit(u16::from(byte), pos, out)
                }
            }
            State::Backslash { start } => {
                if byte == b'u' {
                    self.state = State::Hex {
                        start,
                        digits: 0,
                        value: 0,
                    };
                    Ok(())
                } else {
                    // Not an escape: the backslash is literal, reprocess the byte
                    self.state = State::Text;
                    self.push_unit(BACKSLASH, start, out)?;
                    self.step(byte, pos, out)
                }
            }
            State::Hex {
                start,
                digits,
                value,
            } => {
                let digit = char::from(byte).to_digit(16).ok_or(EscapeError::MalformedEscape {
                    offset: start,
                    found: char::from(byte),
                })?;
                let value = (value << 4) | digit as u16;
                if digits == 3 {
                    self.state = State::Text;
                    self.push_unit(value, start, out)
                } else {
                    self.state = State::Hex {
                        start,
                        digits: digits + 1,
                        value,
                    };
                    Ok(())
                }
            }
        }
    }

    fn push_unit(&mut self, unit: u16, pos: u64, out: &mut String) -> Result<(), EscapeError> {
        if let Some((high, high_pos)) = self.high.take() {
            if !(0xDC00..=0xDFFF).contains(&unit) {
                return Err(EscapeError::UnpairedSurrogate {
                    offset: high_pos,
                    unit: high,
                });
            }
            let code_point =
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
            let ch = char::from_u32(code_point).ok_or(EscapeError::UnpairedSurrogate {
                offset: high_pos,
                unit: high,
            })?;
            out.push(ch);
            return Ok(());
        }

        match unit {
            0xD800..=0xDBFF => {
                self.high = Some((unit, pos));
                Ok(())
            }
            0xDC00..=0xDFFF => Err(EscapeError::UnpairedSurrogate { offset: pos, unit }),
            _ => {
                let ch = char::from_u32(u32::from(unit))
                    .ok_or(EscapeError::UnpairedSurrogate { offset: pos, unit })?;
                out.push(ch);
                Ok(())
            }
        }
    }
}

/// Decode a complete escaped buffer
pub fn decode(input: &[u8]) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(input.len());
    let mut unescaper = Unescaper::new();
    unescaper.feed(input, &mut out)?;
    unescaper.finish(&mut out)?;
    Ok(out)
}
