//! Portable anymap encoding.
//!
//! The output tag is chosen from the buffer's channel count and the requested
//! sample encoding, independent of the format the image was loaded from.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::decode::{PixelBuffer, PixelFormat};

/// Errors that can occur during PNM encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * channels), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The destination could not be created or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a buffer as PNM bytes.
///
/// Writes `<tag>\n<width> <height>\n<max_value>\n` followed by the samples.
/// ASCII output separates samples with a space and ends every image row with
/// a newline; binary output is the raw sample bytes.
///
/// # Errors
///
/// Returns `InvalidDimensions` or `InvalidPixelData` if the buffer is
/// inconsistent with its own metadata.
pub fn encode_pnm(image: &PixelBuffer, ascii: bool) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    write_pnm(&mut out, image, ascii)?;
    Ok(out)
}

/// Encode a buffer and write it to `path`, replacing any existing file.
pub fn save_pnm(image: &PixelBuffer, path: impl AsRef<Path>, ascii: bool) -> Result<(), EncodeError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_pnm(&mut writer, image, ascii)?;
    writer.flush()?;
    Ok(())
}

/// Stream a buffer in PNM form to any writer.
pub fn write_pnm<W: Write>(writer: &mut W, image: &PixelBuffer, ascii: bool) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.pixel_count() * image.channels();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let format = PixelFormat::for_channels(image.channels(), ascii);
    write!(
        writer,
        "{}\n{} {}\n{}\n",
        format.magic(),
        image.width,
        image.height,
        image.max_value
    )?;

    if ascii {
        for row in image.pixels.chunks_exact(image.stride()) {
            let mut samples = row.iter().peekable();
            while let Some(value) = samples.next() {
                let sep = if samples.peek().is_some() { ' ' } else { '\n' };
                write!(writer, "{value}{sep}")?;
            }
        }
    } else {
        writer.write_all(&image.pixels)?;
    }

    debug!(
        format = format.magic(),
        width = image.width,
        height = image.height,
        "encoded PNM image"
    );
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
