//! Core types for the pixel buffer and PNM decoding.

use std::collections::TryReserveError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::Selection;

/// Error types for PNM decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The magic tag is not one of P2, P3, P5, P6.
    #[error("Unrecognized magic tag: {0:?}")]
    UnknownMagic(String),

    /// A header field is missing, non-numeric or out of range.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// An ASCII sample is not a decimal value in 0..=255.
    #[error("Invalid sample {index}: {token:?}")]
    InvalidSample { index: usize, token: String },

    /// Fewer samples than `width * height * channels` were present.
    #[error("Truncated pixel data: expected {expected} samples, got {actual}")]
    TruncatedData { expected: usize, actual: usize },

    /// Out of memory while allocating the pixel grid.
    #[error("Out of memory during decoding")]
    OutOfMemory,
}

/// The four portable-anymap variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// `P2`: grayscale, decimal samples.
    AsciiGray,
    /// `P3`: RGB, decimal samples.
    AsciiRgb,
    /// `P5`: grayscale, raw bytes.
    BinaryGray,
    /// `P6`: RGB, raw bytes.
    BinaryRgb,
}

impl PixelFormat {
    /// Parse a magic tag.
    pub fn from_magic(tag: &str) -> Option<Self> {
        match tag {
            "P2" => Some(PixelFormat::AsciiGray),
            "P3" => Some(PixelFormat::AsciiRgb),
            "P5" => Some(PixelFormat::BinaryGray),
            "P6" => Some(PixelFormat::BinaryRgb),
            _ => None,
        }
    }

    /// Pick the format for a channel count and sample encoding.
    pub fn for_channels(channels: usize, ascii: bool) -> Self {
        match (channels == 1, ascii) {
            (true, true) => PixelFormat::AsciiGray,
            (false, true) => PixelFormat::AsciiRgb,
            (true, false) => PixelFormat::BinaryGray,
            (false, false) => PixelFormat::BinaryRgb,
        }
    }

    pub fn magic(self) -> &'static str {
        match self {
            PixelFormat::AsciiGray => "P2",
            PixelFormat::AsciiRgb => "P3",
            PixelFormat::BinaryGray => "P5",
            PixelFormat::BinaryRgb => "P6",
        }
    }

    /// Samples per pixel: 1 for grayscale, 3 for RGB.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::AsciiGray | PixelFormat::BinaryGray => 1,
            PixelFormat::AsciiRgb | PixelFormat::BinaryRgb => 3,
        }
    }

    #[inline]
    pub fn is_ascii(self) -> bool {
        matches!(self, PixelFormat::AsciiGray | PixelFormat::AsciiRgb)
    }
}

/// A loaded image: metadata, the active selection, and a contiguous
/// row-major sample grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Format the image was decoded from.
    pub format: PixelFormat,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Declared intensity ceiling (1..=255). Informational only.
    pub max_value: u8,
    /// Samples in row-major order, `channels` per pixel.
    /// Length is always width * height * channels.
    pub pixels: Vec<u8>,
    /// Active selection; always fits inside the buffer.
    pub selection: Selection,
}

impl PixelBuffer {
    /// Create a buffer whose selection covers the full extent.
    pub fn new(format: PixelFormat, width: u32, height: u32, max_value: u8, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * format.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            format,
            width,
            height,
            max_value,
            pixels,
            selection: Selection::full(width, height),
        }
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Number of samples in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// Index of the first sample of pixel (`row`, `col`).
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.stride() + col * self.channels()
    }

    /// The samples of pixel (`row`, `col`).
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let idx = self.index(row, col);
        &self.pixels[idx..idx + self.channels()]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the selection spans the whole image.
    pub fn is_fully_selected(&self) -> bool {
        self.selection == Selection::full(self.width, self.height)
    }

    /// Replace grid and dimensions, resetting the selection to the new extent.
    pub(crate) fn replace_grid(&mut self, width: u32, height: u32, pixels: Vec<u8>) {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * self.channels());
        self.width = width;
        self.height = height;
        self.pixels = pixels;
        self.selection = Selection::full(width, height);
    }
}

/// Allocate a zero-filled sample vector without aborting on allocation failure.
pub(crate) fn try_alloc_samples(len: usize) -> Result<Vec<u8>, TryReserveError> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(len)?;
    samples.resize(len, 0);
    Ok(samples)
}
