//! Portable anymap (P2/P3/P5/P6) decoding.
//!
//! Header layout: a magic tag, then width, height and max value as decimal
//! fields. Whitespace and `#` comment lines may appear before every field.
//! A single whitespace byte separates the max value from the sample data.

use std::path::Path;

use tracing::debug;

use super::types::try_alloc_samples;
use super::{DecodeError, PixelBuffer, PixelFormat};

/// Read and decode a PNM file.
///
/// # Errors
///
/// Returns `DecodeError::Io` if the file cannot be read, otherwise any error
/// from [`decode_pnm`].
pub fn load_pnm(path: impl AsRef<Path>) -> Result<PixelBuffer, DecodeError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_pnm(&bytes)
}

/// Decode a PNM image from bytes.
///
/// The returned buffer's selection covers the full image.
///
/// # Errors
///
/// * `UnknownMagic` - the first token is not P2, P3, P5 or P6
/// * `MalformedHeader` - width/height missing or zero, max value missing or
///   outside 1..=255
/// * `InvalidSample` - an ASCII sample is not a decimal value in 0..=255
/// * `TruncatedData` - fewer samples than the header promises
pub fn decode_pnm(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let mut header = HeaderReader::new(bytes);

    let magic = header.read_token();
    let format = PixelFormat::from_magic(&magic).ok_or(DecodeError::UnknownMagic(magic))?;

    let width = header.read_field("width")?;
    let height = header.read_field("height")?;
    let max_value = header.read_field("max value")?;

    if width == 0 || height == 0 {
        return Err(DecodeError::MalformedHeader(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if !(1..=255).contains(&max_value) {
        return Err(DecodeError::MalformedHeader(format!(
            "max value must be in 1..=255, got {max_value}"
        )));
    }
    header.consume_separator()?;

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(format.channels()))
        .ok_or_else(|| {
            DecodeError::MalformedHeader(format!("image dimensions too large: {width}x{height}"))
        })?;

    let data = header.remaining();
    let pixels = if format.is_ascii() {
        read_ascii_samples(data, expected)?
    } else {
        read_binary_samples(data, expected)?
    };

    debug!(
        format = format.magic(),
        width, height, max_value, "decoded PNM image"
    );

    Ok(PixelBuffer::new(
        format,
        width,
        height,
        max_value as u8,
        pixels,
    ))
}

fn read_ascii_samples(data: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    // Every sample needs at least one byte of input.
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(expected.min(data.len()))
        .map_err(|_| DecodeError::OutOfMemory)?;

    let tokens = data
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    for (index, token) in tokens.take(expected).enumerate() {
        let value = std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .filter(|v| *v <= 255)
            .ok_or_else(|| DecodeError::InvalidSample {
                index,
                token: String::from_utf8_lossy(token).into_owned(),
            })?;
        pixels.push(value as u8);
    }

    if pixels.len() < expected {
        return Err(DecodeError::TruncatedData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(pixels)
}

fn read_binary_samples(data: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    if data.len() < expected {
        return Err(DecodeError::TruncatedData {
            expected,
            actual: data.len(),
        });
    }
    let mut pixels = try_alloc_samples(expected).map_err(|_| DecodeError::OutOfMemory)?;
    pixels.copy_from_slice(&data[..expected]);
    Ok(pixels)
}

/// Cursor over the header bytes.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Skip any mix of whitespace runs and full `#` comment lines.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Next whitespace-delimited token, possibly empty at end of input.
    fn read_token(&mut self) -> String {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while matches!(self.peek(), Some(b) if !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    fn read_field(&mut self, name: &str) -> Result<u32, DecodeError> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(|| DecodeError::MalformedHeader(format!("missing or invalid {name}")))
    }

    /// Consume the single whitespace byte that ends the header.
    fn consume_separator(&mut self) -> Result<(), DecodeError> {
        match self.peek() {
            Some(b) if b.is_ascii_whitespace() => {
                self.pos += 1;
                Ok(())
            }
            None => Ok(()),
            Some(_) => Err(DecodeError::MalformedHeader(
                "expected whitespace after max value".to_string(),
            )),
        }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}
